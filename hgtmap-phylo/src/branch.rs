use crate::{FromNewick, ToNewick};

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::{Display, Formatter};

/// The [`Branch`] leading to a [`Node`](crate::Node) in the [`Tree`](crate::Tree).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Branch {
    /// [`Branch`] length (ex. 1.0).
    pub length: f32,
    /// [`Branch`] confidence (ex. 90.0).
    pub confidence: f32,
}

#[rustfmt::skip]
impl Default for Branch { fn default() -> Self { Self::new() } }
#[rustfmt::skip]
impl Display for Branch { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.length) } }
#[rustfmt::skip]
impl Branch { pub fn new() -> Self { Branch { length: 0.0, confidence: 0.0 } } }

impl Branch {
    /// Returns true if neither length nor confidence were set.
    pub fn is_empty(&self) -> bool {
        self.length == 0.0 && self.confidence == 0.0
    }
}

impl FromNewick for Branch {
    /// Returns a [`Branch`] created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) node [`str`].
    ///
    /// # Examples
    ///
    /// Just a node name.
    ///
    /// ```rust
    /// use hgtmap_phylo::{Branch, FromNewick};
    ///
    /// let branch = Branch::from_newick(&"A")?;
    /// assert_eq!(branch, Branch { length: 0.0, confidence: 0.0 });
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// Just branch attributes.
    ///
    /// ```rust
    /// # use hgtmap_phylo::{Branch, FromNewick};
    /// let branch = Branch::from_newick(&":2:90")?;
    /// assert_eq!(branch, Branch { length: 2.0, confidence: 90.0 });
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// Branch confidence as a decimal.
    ///
    /// ```rust
    /// # use hgtmap_phylo::{Branch, FromNewick};
    /// let branch = Branch::from_newick(&":2:0.75")?;
    /// assert_eq!(branch, Branch { length: 2.0, confidence: 75.0 });
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// A length that is not a number is an error.
    ///
    /// ```rust
    /// # use hgtmap_phylo::{Branch, FromNewick};
    /// assert!(Branch::from_newick(&"A:x").is_err());
    /// ```
    fn from_newick(newick: &str) -> Result<Branch, Report> {
        let attributes: Vec<_> = newick.replace(';', "").split(':').map(|s| s.trim().to_string()).collect();
        let length = match attributes.len() >= 2 && !attributes[1].is_empty() {
            true => attributes[1]
                .parse()
                .wrap_err_with(|| eyre!("Failed to parse branch length from newick: {newick}"))?,
            false => 0.0,
        };
        let confidence = match attributes.len() >= 3 && !attributes[2].is_empty() {
            true => {
                let confidence: f32 = attributes[2]
                    .parse()
                    .wrap_err_with(|| eyre!("Failed to parse confidence from newick: {newick}"))?;
                // if confidence is a decimal, multiply by 100
                match confidence < 1.0 {
                    true => confidence * 100.0,
                    false => confidence,
                }
            }
            false => 0.0,
        };

        Ok(Branch { length, confidence })
    }
}

impl ToNewick for Branch {
    /// Returns the `:length[:confidence]` suffix, empty when nothing was set.
    ///
    /// ```rust
    /// use hgtmap_phylo::{Branch, ToNewick};
    /// assert_eq!(Branch { length: 0.5, confidence: 0.0 }.to_newick()?, ":0.5");
    /// assert_eq!(Branch::new().to_newick()?, "");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn to_newick(&self) -> Result<String, Report> {
        let newick = match (self.is_empty(), self.confidence == 0.0) {
            (true, _) => String::new(),
            (false, true) => format!(":{}", self.length),
            (false, false) => format!(":{}:{}", self.length, self.confidence),
        };
        Ok(newick)
    }
}
