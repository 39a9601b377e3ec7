//! Named route table used to build canonical URLs.
//!
//! Patterns are written with typed placeholders, e.g. `post/<slug:slug>/`.
//! Supported converters are `str` (the default), `slug`, `int` and `uuid`.

use crate::{Error, Result};
use regex::Regex;
use std::{collections::BTreeMap, sync::OnceLock};

/// Route name of the post detail view
pub const POST_DETAIL_ROUTE: &str = "blog:post_details";

/// Pattern the post detail view is mounted at unless configured otherwise
pub const DEFAULT_POST_DETAIL_PATTERN: &str = "post/<slug:slug>/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Converter {
    Str,
    Slug,
    Int,
    Uuid,
}

impl Converter {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Self::Str),
            "slug" => Some(Self::Slug),
            "int" => Some(Self::Int),
            "uuid" => Some(Self::Uuid),
            _ => None,
        }
    }

    fn regex(&self) -> &'static Regex {
        static STR: OnceLock<Regex> = OnceLock::new();
        static SLUG: OnceLock<Regex> = OnceLock::new();
        static INT: OnceLock<Regex> = OnceLock::new();
        static UUID: OnceLock<Regex> = OnceLock::new();
        let (cell, pattern) = match self {
            Self::Str => (&STR, r"^[^/]+$"),
            Self::Slug => (&SLUG, r"^[-a-zA-Z0-9_]+$"),
            Self::Int => (&INT, r"^[0-9]+$"),
            Self::Uuid => (
                &UUID,
                r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
            ),
        };
        cell.get_or_init(|| Regex::new(pattern).expect("static regex"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, converter: Converter },
}

/// A parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern such as `post/<slug:slug>/` or `user/<int:id>/`
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidRoute {
            pattern: pattern.to_owned(),
            reason: reason.to_owned(),
        };

        let mut segments = Vec::new();
        let mut rest = pattern;
        while let Some(start) = rest.find('<') {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_owned()));
            }
            let end = rest[start..]
                .find('>')
                .ok_or_else(|| invalid("unterminated placeholder"))?
                + start;
            let inner = &rest[start + 1..end];
            let (converter, name) = match inner.split_once(':') {
                Some((conv, name)) => (
                    Converter::parse(conv)
                        .ok_or_else(|| invalid(&format!("unknown converter '{conv}'")))?,
                    name,
                ),
                None => (Converter::Str, inner),
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid(&format!("invalid parameter name '{name}'")));
            }
            segments.push(Segment::Param {
                name: name.to_owned(),
                converter,
            });
            rest = &rest[end + 1..];
        }
        if rest.contains('>') {
            return Err(invalid("unbalanced '>'"));
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }

        Ok(Self {
            source: pattern.to_owned(),
            segments,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Named routes that canonical URLs are reversed through
#[derive(Debug, Clone)]
pub struct Routes {
    prefix: String,
    routes: BTreeMap<String, RoutePattern>,
}

impl Default for Routes {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Routes {
    /// An empty table whose URLs are mounted under `prefix`
    pub fn new(prefix: &str) -> Self {
        let mut prefix = prefix.to_owned();
        if !prefix.starts_with('/') {
            prefix.insert(0, '/');
        }
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            prefix,
            routes: BTreeMap::new(),
        }
    }

    /// The routes of the blog app, with the post detail view at [`DEFAULT_POST_DETAIL_PATTERN`]
    pub fn blog() -> Self {
        let mut routes = Self::default();
        routes
            .register(POST_DETAIL_ROUTE, DEFAULT_POST_DETAIL_PATTERN)
            .expect("default pattern parses");
        routes
    }

    /// Register `pattern` under `name`, replacing any previous route of that name
    pub fn register(&mut self, name: &str, pattern: &str) -> Result<&mut Self> {
        let pattern = RoutePattern::parse(pattern)?;
        self.routes.insert(name.to_owned(), pattern);
        Ok(self)
    }

    /// Whether a route is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Build the path of route `name` from keyword arguments.
    ///
    /// Every placeholder needs exactly one argument of the same name whose value
    /// satisfies the placeholder's converter, and no extra arguments are accepted.
    pub fn reverse(&self, name: &str, kwargs: &[(&str, &str)]) -> Result<String> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| Error::no_reverse_match(name, "no route registered under this name"))?;

        for (key, _) in kwargs {
            if !pattern.params().any(|p| p == *key) {
                return Err(Error::no_reverse_match(
                    name,
                    format!("unexpected argument '{key}'"),
                ));
            }
        }

        let mut path = self.prefix.clone();
        for segment in &pattern.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param { name: param, converter } => {
                    let value = kwargs
                        .iter()
                        .find(|(key, _)| *key == param.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            Error::no_reverse_match(name, format!("missing argument '{param}'"))
                        })?;
                    if !converter.regex().is_match(value) {
                        return Err(Error::no_reverse_match(
                            name,
                            format!("argument '{param}' = {value:?} does not match <{converter:?}>"),
                        ));
                    }
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blog_routes_mount_post_detail() {
        assert!(RoutePattern::parse(DEFAULT_POST_DETAIL_PATTERN).is_ok());
        let routes = Routes::blog();
        assert!(routes.contains(POST_DETAIL_ROUTE));
        assert!(!Routes::default().contains(POST_DETAIL_ROUTE));
    }

    #[test]
    fn reverse_post_detail() {
        let routes = Routes::blog();
        assert_eq!(
            routes.reverse(POST_DETAIL_ROUTE, &[("slug", "hello-world")]).unwrap(),
            "/post/hello-world/"
        );
    }

    #[test]
    fn reverse_with_prefix() {
        let mut routes = Routes::new("blog");
        routes.register("blog:user", "user/<int:id>/posts/<slug>").unwrap();
        assert_eq!(
            routes.reverse("blog:user", &[("id", "42"), ("slug", "x")]).unwrap(),
            "/blog/user/42/posts/x"
        );
    }

    #[test]
    fn unknown_route() {
        let err = Routes::default()
            .reverse(POST_DETAIL_ROUTE, &[("slug", "a")])
            .unwrap_err();
        assert!(matches!(err, Error::NoReverseMatch { .. }));
    }

    #[test]
    fn converter_rejects_value() {
        let routes = Routes::blog();
        assert!(routes.reverse(POST_DETAIL_ROUTE, &[("slug", "")]).is_err());
        assert!(routes.reverse(POST_DETAIL_ROUTE, &[("slug", "a b")]).is_err());
        assert!(routes.reverse(POST_DETAIL_ROUTE, &[]).is_err());
        assert!(routes
            .reverse(POST_DETAIL_ROUTE, &[("slug", "a"), ("page", "2")])
            .is_err());
    }

    #[test]
    fn invalid_patterns() {
        assert!(RoutePattern::parse("post/<slug").is_err());
        assert!(RoutePattern::parse("post/<float:x>/").is_err());
        assert!(RoutePattern::parse("post/<slug:>/").is_err());
        assert!(RoutePattern::parse("post/slug>/").is_err());
        assert_eq!(RoutePattern::parse("about/").unwrap().as_str(), "about/");
    }
}
