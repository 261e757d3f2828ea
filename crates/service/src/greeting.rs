use serde::Deserialize;

const GENERIC_MESSAGE: &str = "This HTTP triggered function executed successfully. Pass a name in the query string or in the request body for a personalized response.";

/// Optional body of the greeting endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct GreetingBody {
    #[serde(default)]
    pub name: Option<String>,
}

/// Query value first, even when empty; otherwise `name` from a JSON body.
/// Bodies that are empty or not a JSON object carry no name.
pub fn resolve_name(query: Option<String>, body: &[u8]) -> Option<String> {
    if query.is_some() {
        return query;
    }
    serde_json::from_slice::<Option<GreetingBody>>(body)
        .ok()
        .flatten()
        .and_then(|b| b.name)
}

pub fn greeting_message(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.is_empty() => format!("Hello, {}. This HTTP triggered function executed successfully.", n),
        _ => GENERIC_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_wins_over_body() {
        let name = resolve_name(Some("Query".into()), br#"{"name":"Body"}"#);
        assert_eq!(name.as_deref(), Some("Query"));
    }

    #[test]
    fn empty_query_still_wins() {
        let name = resolve_name(Some(String::new()), br#"{"name":"Body"}"#);
        assert_eq!(greeting_message(name.as_deref()), GENERIC_MESSAGE);
    }

    #[test]
    fn body_name_used_without_query() {
        let name = resolve_name(None, br#"{"name":"Ann"}"#);
        assert_eq!(
            greeting_message(name.as_deref()),
            "Hello, Ann. This HTTP triggered function executed successfully."
        );
    }

    #[test]
    fn unusable_bodies_carry_no_name() {
        let bodies: [&[u8]; 6] = [b"", b"null", b"not json", br#"{"name":null}"#, br#"{"other":1}"#, b"[1,2]"];
        for body in bodies {
            assert_eq!(resolve_name(None, body), None);
        }
        assert_eq!(greeting_message(None), GENERIC_MESSAGE);
    }
}
