use std::ops::Deref;

/// Requested inclusion paths ("with" paths)
///
/// Accepts a comma-joined string (`"author,comments.author"`), a list of
/// paths, or nothing at all. Paths are kept verbatim; splitting on `.`
/// happens later, one level at a time, inside each class presenter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inclusions(Vec<String>);

impl Inclusions {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Split a comma-joined request. An empty string requests nothing.
    ///
    /// `""` yields `[]`, not `[""]`, so an inclusion registered under the
    /// empty name is never selected by an empty request.
    pub fn parse(joined: &str) -> Self {
        if joined.is_empty() {
            return Self::none();
        }
        Self(joined.split(',').map(str::to_string).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Inclusions {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for Inclusions {
    fn from(joined: &str) -> Self {
        Self::parse(joined)
    }
}

impl From<String> for Inclusions {
    fn from(joined: String) -> Self {
        Self::parse(&joined)
    }
}

impl From<Vec<String>> for Inclusions {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl From<Vec<&str>> for Inclusions {
    fn from(paths: Vec<&str>) -> Self {
        Self(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for Inclusions {
    fn from(paths: &[String]) -> Self {
        Self(paths.to_vec())
    }
}

impl From<&[&str]> for Inclusions {
    fn from(paths: &[&str]) -> Self {
        Self(paths.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Inclusions {
    fn from(paths: [&str; N]) -> Self {
        Self(paths.iter().map(|p| p.to_string()).collect())
    }
}

impl From<&Inclusions> for Inclusions {
    fn from(inclusions: &Inclusions) -> Self {
        inclusions.clone()
    }
}

impl<T: Into<Inclusions>> From<Option<T>> for Inclusions {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::none, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_joined() {
        let inclusions = Inclusions::from("author,comments.author");
        assert_eq!(inclusions.as_slice(), ["author", "comments.author"]);
    }

    #[test]
    fn test_parse_keeps_segments_verbatim() {
        let inclusions = Inclusions::parse("a,,b ");
        assert_eq!(inclusions.as_slice(), ["a", "", "b "]);
    }

    #[test]
    fn test_empty_string_requests_nothing() {
        assert!(Inclusions::from("").is_empty());
        assert!(Inclusions::from(None::<&str>).is_empty());
    }

    #[test]
    fn test_list_input_is_not_split() {
        let inclusions = Inclusions::from(vec!["a,b", "c"]);
        assert_eq!(inclusions.len(), 2);
        assert_eq!(inclusions[0], "a,b");
    }
}
