//! Path routing.

use crate::error::{ServerError, ServerResult};
use std::fmt;
use std::str::FromStr;

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read a record.
    Get,
    /// Create a record.
    Post,
}

impl FromStr for Method {
    type Err = ServerError;

    fn from_str(s: &str) -> ServerResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(ServerError::MethodNotAllowed),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// What a path addresses within a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The resource itself, e.g. `/vendors`.
    Collection,
    /// One record by key, e.g. `/vendors/ab12cd`.
    Key(String),
    /// The first record matching a field, e.g. `/vendors/?name=Acme`.
    Query {
        /// Field to match.
        field: String,
        /// Decoded value to match.
        value: String,
    },
}

/// A path prefix bound to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path prefix, e.g. `/vendors`.
    pub prefix: String,
    /// Resource name.
    pub resource: String,
}

/// Maps request paths to resources.
///
/// Routes are tried in registration order; a prefix only matches on a
/// whole path segment, so `/vendors` never matches `/vendorbills`.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `resource`.
    pub fn register(&mut self, prefix: impl Into<String>, resource: impl Into<String>) {
        let prefix = prefix.into();
        self.routes.push(Route {
            prefix: prefix.trim_end_matches('/').to_string(),
            resource: resource.into(),
        });
    }

    /// Returns the registered routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolves `path` to its route and target.
    ///
    /// # Errors
    ///
    /// - [`ServerError::RouteNotFound`] if no route matches
    /// - [`ServerError::InvalidRequest`] for undecodable keys or queries
    pub fn resolve(&self, path: &str) -> ServerResult<(&Route, Target)> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        for route in &self.routes {
            let Some(rest) = path.strip_prefix(route.prefix.as_str()) else {
                continue;
            };
            if !(rest.is_empty() || rest.starts_with('/')) {
                continue;
            }
            let rest = rest.trim_start_matches('/');
            if rest.contains('/') {
                continue;
            }

            let target = if !rest.is_empty() {
                Target::Key(decode(rest)?)
            } else {
                match query.filter(|q| !q.is_empty()) {
                    Some(query) => parse_query(query)?,
                    None => Target::Collection,
                }
            };
            return Ok((route, target));
        }

        Err(ServerError::RouteNotFound(path.to_string()))
    }
}

/// Parses the first `field=value` pair of a query string.
fn parse_query(query: &str) -> ServerResult<Target> {
    let pair = query.split('&').next().unwrap_or_default();
    let (field, value) = pair.split_once('=').unwrap_or((pair, ""));
    let field = decode(field)?;
    if field.is_empty() {
        return Err(ServerError::InvalidRequest(format!(
            "query '{query}' names no field"
        )));
    }
    Ok(Target::Query {
        field,
        value: decode(value)?,
    })
}

fn decode(text: &str) -> ServerResult<String> {
    let text = text.replace('+', " ");
    urlencoding::decode(&text)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| ServerError::InvalidRequest(format!("cannot decode '{text}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        let mut router = Router::new();
        router.register("/vendors", "Vendor");
        router.register("/vendorbills/", "VendorBill");
        router.register("/currencies", "Currency");
        router
    }

    #[test]
    fn method_parsing() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert!(matches!(
            "DELETE".parse::<Method>(),
            Err(ServerError::MethodNotAllowed)
        ));
    }

    #[test]
    fn resolves_collection_key_and_query() {
        let router = router();

        let (route, target) = router.resolve("/vendors").unwrap();
        assert_eq!(route.resource, "Vendor");
        assert_eq!(target, Target::Collection);

        let (_, target) = router.resolve("/vendors/").unwrap();
        assert_eq!(target, Target::Collection);

        let (_, target) = router.resolve("/vendors/ab12cd").unwrap();
        assert_eq!(target, Target::Key("ab12cd".into()));

        let (route, target) = router.resolve("/currencies/?iso_code=CAD").unwrap();
        assert_eq!(route.resource, "Currency");
        assert_eq!(
            target,
            Target::Query {
                field: "iso_code".into(),
                value: "CAD".into()
            }
        );
    }

    #[test]
    fn prefixes_match_whole_segments() {
        let router = router();
        let (route, _) = router.resolve("/vendorbills").unwrap();
        assert_eq!(route.resource, "VendorBill");
        assert!(matches!(
            router.resolve("/vendorsx"),
            Err(ServerError::RouteNotFound(_))
        ));
        assert!(matches!(
            router.resolve("/vendors/a/b"),
            Err(ServerError::RouteNotFound(_))
        ));
        assert!(matches!(
            router.resolve("/coa/1"),
            Err(ServerError::RouteNotFound(_))
        ));
    }

    #[test]
    fn query_values_are_decoded() {
        let (_, target) = router()
            .resolve("/currencies/?name=Canadian%20Dollar&ignored=1")
            .unwrap();
        assert_eq!(
            target,
            Target::Query {
                field: "name".into(),
                value: "Canadian Dollar".into()
            }
        );

        let (_, target) = router().resolve("/currencies?name=British+Pound").unwrap();
        assert_eq!(
            target,
            Target::Query {
                field: "name".into(),
                value: "British Pound".into()
            }
        );
    }

    #[test]
    fn query_without_field_is_invalid() {
        assert!(matches!(
            router().resolve("/currencies/?=CAD"),
            Err(ServerError::InvalidRequest(_))
        ));
    }
}
