use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Stable identifier of a presentable type
///
/// Used as the key for presenter lookup, resolver lookup and alias targets.
/// It is deliberately decoupled from Rust's type names so renaming a struct
/// does not break registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    /// Create a new TypeTag from any string-like value
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Get the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tag of a statically known type
    pub fn of<T: Tagged>() -> Self {
        Self(T::TAG.to_string())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TypeTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TypeTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&TypeTag> for TypeTag {
    fn from(tag: &TypeTag) -> Self {
        tag.clone()
    }
}

impl AsRef<str> for TypeTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Domain types with a fixed, compile-time tag
///
/// ```
/// use vitrine_types::{Tagged, Value};
///
/// #[derive(Debug)]
/// struct Post {
///     title: String,
/// }
///
/// impl Tagged for Post {
///     const TAG: &'static str = "blog.post";
/// }
///
/// let value = Value::object(Post { title: "Hello".into() });
/// assert_eq!(value.type_tag().unwrap().as_str(), "blog.post");
/// assert_eq!(value.downcast_ref::<Post>().unwrap().title, "Hello");
/// ```
pub trait Tagged {
    const TAG: &'static str;
}

/// Runtime-dispatched subject of presentation
///
/// Every `Tagged` type gets this for free. Implement it by hand when the tag
/// is only known at runtime.
pub trait Presentable: Any + fmt::Debug + Send + Sync {
    fn type_tag(&self) -> TypeTag;

    fn as_any(&self) -> &dyn Any;
}

impl<T> Presentable for T
where
    T: Tagged + Any + fmt::Debug + Send + Sync,
{
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Widget;

    impl Tagged for Widget {
        const TAG: &'static str = "widget";
    }

    #[test]
    fn test_tag_of_tagged_type() {
        assert_eq!(TypeTag::of::<Widget>(), TypeTag::from("widget"));
        assert_eq!(Widget.type_tag().as_str(), "widget");
    }

    #[test]
    fn test_tag_serializes_transparently() {
        let json = serde_json::to_string(&TypeTag::new("blog.post")).unwrap();
        assert_eq!(json, "\"blog.post\"");
    }
}
