//! Extension traits

use extfn::extfn;
use url::Url;

/// Join all provided components into the URL.
///
/// This is a convenience method over joining multiple components using
/// [`Url::join`], allowing the caller to check the result for errors once at
/// the end instead of piece by piece.
///
/// Every component except the last is treated as a directory: a trailing
/// slash is appended when missing, so `["factures", "12", "paiements"]`
/// joins to `factures/12/paiements` under the base rather than each
/// component replacing the previous one.
///
/// # Notes
///
/// - The base itself must end with a slash for components to be nested
///   under its last path segment; see [`with_trailing_slash`].
/// - An absolute URL (with a scheme) as a component replaces the whole URL.
#[extfn]
pub fn join_all(
    self: &Url,
    components: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<Url, url::ParseError> {
    let mut base = self.clone();
    let mut components = components.into_iter().peekable();
    while let Some(component) = components.next() {
        let component = component.as_ref().trim_matches('/');
        base = if components.peek().is_some() {
            base.join(&format!("{component}/"))?
        } else {
            base.join(component)?
        };
    }
    Ok(base)
}

/// Ensure the URL path ends with a slash so relative joins nest under it.
#[extfn]
pub fn with_trailing_slash(self: Url) -> Url {
    if self.path().ends_with('/') {
        return self;
    }
    let mut url = self;
    let path = format!("{}/", url.path());
    url.set_path(&path);
    url
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq as pretty_assert_eq;
    use simple_test_case::test_case;

    use super::*;

    #[test_case("http://localhost:8000/api", "http://localhost:8000/api/"; "missing")]
    #[test_case("http://localhost:8000/api/", "http://localhost:8000/api/"; "present")]
    #[test_case("http://localhost:8000", "http://localhost:8000/"; "root")]
    #[test]
    fn trailing_slash(raw: &str, expected: &str) {
        let url = Url::parse(raw).expect("parse url").with_trailing_slash();
        pretty_assert_eq!(url.as_str(), expected);
    }

    #[test_case(&["clients"], "http://localhost/api/clients"; "single")]
    #[test_case(&["clients", "7"], "http://localhost/api/clients/7"; "nested")]
    #[test_case(&["factures", "12", "paiements"], "http://localhost/api/factures/12/paiements"; "deep")]
    #[test_case(&["/voyages/"], "http://localhost/api/voyages"; "slashes")]
    #[test]
    fn joins_components(components: &[&str], expected: &str) {
        let base = Url::parse("http://localhost/api/").expect("parse url");
        let url = base.join_all(components).expect("join url");
        pretty_assert_eq!(url.as_str(), expected);
    }
}
