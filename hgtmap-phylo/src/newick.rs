use crate::{Branch, FromNewick, Node, Tree};
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;

/// Returns a [`Tree`] parsed from an input Newick string.
///
/// Accepts nested parentheses of any arity, tip and internal labels, branch lengths
/// (`:0.1`), `:length:confidence` suffixes, single-quoted labels (`'E. coli'`, with `''`
/// as an escaped quote), `[...]` comments, whitespace and an optional trailing `;`.
///
/// # Examples
///
/// ```rust
/// use hgtmap_phylo::newick;
/// let tree = newick::parse("('strain A':0.1,[comment](B,C)90:0.2);")?;
/// assert_eq!(tree.leaves(), ["strain A", "B", "C"]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
///
/// Unbalanced parentheses, unnamed tips and duplicate tip names are errors.
///
/// ```rust
/// use hgtmap_phylo::newick;
/// assert!(newick::parse("((A,B),C;").is_err());
/// assert!(newick::parse("(A,B));").is_err());
/// assert!(newick::parse("(A,,B);").is_err());
/// assert!(newick::parse("(A,(B,A));").is_err());
/// ```
pub fn parse(newick: &str) -> Result<Tree, Report> {
    let mut parser = Parser::new(newick);
    let tree = parser.subtree()?;

    // optional terminator, then nothing but whitespace/comments
    parser.skip_ignored()?;
    if parser.peek() == Some(';') {
        parser.pos += 1;
        parser.skip_ignored()?;
    }
    if let Some(c) = parser.peek() {
        let msg = match c {
            ')' => format!("Unbalanced parentheses: unexpected ')' at position {}.", parser.pos),
            _ => format!("Unexpected {c:?} at position {} after the end of the tree.", parser.pos),
        };
        return Err(eyre!(msg));
    }

    // tip names are genome identifiers, so they must be unique
    let duplicates = tree.leaves().into_iter().duplicates().collect_vec();
    if !duplicates.is_empty() {
        return Err(eyre!("Duplicate leaf names in tree: {}", duplicates.iter().join(", "))
            .suggestion("Every tip of the tree must be a distinct genome name."));
    }

    Ok(tree)
}

/// Characters that end an unquoted label (or branch suffix).
const DELIMITERS: &[char] = &['(', ')', ',', ';'];

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(newick: &str) -> Self {
        Parser { chars: newick.chars().collect(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Skip whitespace and `[...]` comments.
    fn skip_ignored(&mut self) -> Result<(), Report> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == '[' {
                self.skip_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<(), Report> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == ']' {
                return Ok(());
            }
        }
        Err(eyre!("Unterminated comment starting at position {start}."))
    }

    /// Parse a leaf or a parenthesized clade, followed by its label and branch.
    fn subtree(&mut self) -> Result<Tree, Report> {
        self.skip_ignored()?;

        if self.peek() != Some('(') {
            let start = self.pos;
            let node = self.node()?;
            if node.label.is_empty() {
                return Err(eyre!("Leaf at position {start} has no name.")
                    .suggestion("Every tip of the tree must be labelled with a genome name."));
            }
            return Ok(Tree::Leaf(node));
        }

        let open = self.pos;
        self.pos += 1;
        let mut children = vec![self.subtree()?];
        loop {
            self.skip_ignored()?;
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    children.push(self.subtree()?);
                }
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some(c) => {
                    return Err(eyre!("Unexpected {c:?} at position {} inside clade.", self.pos))
                }
                None => {
                    return Err(eyre!(
                        "Unbalanced parentheses: '(' at position {open} is never closed."
                    ))
                }
            }
        }

        let node = self.node()?;
        Ok(Tree::Clade { node, children })
    }

    /// Parse an optional (possibly quoted) label and branch suffix.
    fn node(&mut self) -> Result<Node, Report> {
        self.skip_ignored()?;
        let start = self.pos;

        let quoted = match self.peek() {
            Some('\'') => Some(self.quoted()?),
            _ => None,
        };

        // collect everything up to the next delimiter, dropping comments
        let mut raw = String::new();
        while let Some(c) = self.peek() {
            if DELIMITERS.contains(&c) {
                break;
            } else if c == '[' {
                self.skip_comment()?;
            } else {
                raw.push(c);
                self.pos += 1;
            }
        }
        let raw = raw.trim();

        match quoted {
            Some(_) if !raw.is_empty() && !raw.starts_with(':') => {
                Err(eyre!("Unexpected text {raw:?} after quoted label at position {start}."))
            }
            Some(label) => {
                let branch = Branch::from_newick(raw)
                    .wrap_err_with(|| eyre!("Failed to parse node at position {start}: {raw:?}"))?;
                Ok(Node { label, branch })
            }
            None => Node::from_newick(raw)
                .wrap_err_with(|| eyre!("Failed to parse node at position {start}: {raw:?}")),
        }
    }

    fn quoted(&mut self) -> Result<String, Report> {
        let start = self.pos;
        self.pos += 1;
        let mut label = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\'' {
                // '' is an escaped quote inside a quoted label
                if self.peek() == Some('\'') {
                    label.push('\'');
                    self.pos += 1;
                } else {
                    return Ok(label);
                }
            } else {
                label.push(c);
            }
        }
        Err(eyre!("Unterminated quoted label starting at position {start}."))
    }
}
