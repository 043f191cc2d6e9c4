//! Share declarations: `share.<name>=<source>:<target>` image labels.

use std::str::FromStr;

use crate::errors::SailError;

/// An additional bind mount required by an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDecl {
    pub source: String,
    pub target: String,
}

impl FromStr for ShareDecl {
    type Err = SailError;

    /// Exactly one `:` with non-empty sides.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = value.split(':').collect();
        match tokens.as_slice() {
            [source, target] if !source.is_empty() && !target.is_empty() => Ok(ShareDecl {
                source: source.to_string(),
                target: target.to_string(),
            }),
            _ => Err(SailError::MalformedShare {
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_share() {
        let share: ShareDecl = "/host/x:/guest/y".parse().unwrap();
        assert_eq!(share.source, "/host/x");
        assert_eq!(share.target, "/guest/y");

        let share: ShareDecl = "~/go:~/go".parse().unwrap();
        assert_eq!(share.source, "~/go");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for value in ["a:b:c", "noseparator", ":", "a:", ":b", ""] {
            match value.parse::<ShareDecl>() {
                Err(SailError::MalformedShare { value: v }) => assert_eq!(v, value),
                other => panic!("expected malformed share for {value:?}, got {other:?}"),
            }
        }
    }
}
