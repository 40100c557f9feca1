//! Route a resolved resource name to exactly one registry operation.

use crate::error::Result;
use crate::names::{ResourceKind, ResourceName};
use crate::registry::{Pager, RegistryApi, Resource};
use std::sync::Arc;

/// The single outbound request a resource name turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// List every `kind` child of `parent`.
    List { kind: ResourceKind, parent: String },
    /// Fetch one resource by its full name.
    Get { kind: ResourceKind, name: String },
}

impl Request {
    pub fn for_name(name: &ResourceName) -> Self {
        if name.pattern().is_collection() {
            Request::List {
                kind: name.kind(),
                parent: name.path(),
            }
        } else {
            Request::Get {
                kind: name.kind(),
                name: name.path(),
            }
        }
    }
}

/// What the registry handed back for a request.
pub enum Response {
    List(Pager),
    /// The get result is kept as-is; the caller decides how to treat failures.
    Get(Result<Resource>),
}

/// Issue `request` against `api`.
///
/// List requests are lazy: no network call happens until the returned pager is
/// first pulled.
pub async fn dispatch(api: Arc<dyn RegistryApi>, request: Request) -> Response {
    match request {
        Request::List { kind, parent } => {
            tracing::debug!(%kind, %parent, "listing");
            Response::List(Pager::new(api, kind, parent))
        }
        Request::Get { kind, name } => {
            tracing::debug!(%kind, %name, "getting");
            Response::Get(api.get(kind, &name).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::registry::tests::{page, FakeRegistry};
    use crate::resolver::resolve;

    fn request(input: &str) -> Request {
        Request::for_name(&resolve(input).matched().unwrap())
    }

    #[test]
    fn test_collections_list_under_parent() {
        assert_eq!(
            request("projects/p1/products"),
            Request::List {
                kind: ResourceKind::Product,
                parent: "projects/p1".into()
            }
        );
        assert_eq!(
            request("projects/p1/products/q1/versions"),
            Request::List {
                kind: ResourceKind::Version,
                parent: "projects/p1/products/q1".into()
            }
        );
        assert_eq!(
            request("projects/p1/products/q1/versions/v1/specs"),
            Request::List {
                kind: ResourceKind::Spec,
                parent: "projects/p1/products/q1/versions/v1".into()
            }
        );
        assert_eq!(
            request("projects/p1/products/q1/versions/v1/specs/s1/files"),
            Request::List {
                kind: ResourceKind::File,
                parent: "projects/p1/products/q1/versions/v1/specs/s1".into()
            }
        );
    }

    #[test]
    fn test_singulars_get_full_name() {
        for (input, kind) in [
            ("projects/p1/products/q1", ResourceKind::Product),
            ("projects/p1/products/q1/versions/v1", ResourceKind::Version),
            ("projects/p1/products/q1/versions/v1/specs/s1", ResourceKind::Spec),
            (
                "projects/p1/products/q1/versions/v1/specs/s1/files/dir/name.txt",
                ResourceKind::File,
            ),
        ] {
            assert_eq!(
                request(input),
                Request::Get {
                    kind,
                    name: input.into()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_list_dispatch_is_lazy() {
        let fake = Arc::new(FakeRegistry::with_pages(vec![Ok(page(&["x"], None))]));
        let response = dispatch(fake.clone(), request("projects/p1/products")).await;
        assert!(fake.calls().is_empty());
        let Response::List(mut pager) = response else {
            panic!("expected a list response");
        };
        assert_eq!(pager.parent(), "projects/p1");
        assert_eq!(pager.next().await.unwrap().unwrap().name, "x");
        assert_eq!(fake.calls(), ["list product projects/p1 -"]);
    }

    #[tokio::test]
    async fn test_get_dispatch_returns_remote_error() {
        let fake = Arc::new(FakeRegistry::default());
        let response = dispatch(fake.clone(), request("projects/p1/products/missing")).await;
        let Response::Get(result) = response else {
            panic!("expected a get response");
        };
        assert!(matches!(result, Err(Error::Remote { status: 404, .. })));
        assert_eq!(fake.calls(), ["get product projects/p1/products/missing"]);
    }
}
