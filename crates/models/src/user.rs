use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;

/// A user record as persisted in the datastore file.
///
/// Keys are PascalCase on the wire. On input keys match case-insensitively,
/// numbers and booleans are taken as their text, and a missing or `null`
/// field reads as the empty string. Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), email: email.into() }
    }
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(UserVisitor)
    }
}

struct UserVisitor;

impl<'de> Visitor<'de> for UserVisitor {
    type Value = User;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a user object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<User, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut user = User::default();
        while let Some(key) = map.next_key::<String>()? {
            let field = match key.to_ascii_lowercase().as_str() {
                "id" => &mut user.id,
                "name" => &mut user.name,
                "email" => &mut user.email,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            *field = map.next_value::<ScalarText>()?.0;
        }
        Ok(user)
    }
}

/// A JSON scalar read as text; `null` is the empty string.
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarTextVisitor)
    }
}

struct ScalarTextVisitor;

impl<'de> Visitor<'de> for ScalarTextVisitor {
    type Value = ScalarText;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ScalarText, E> { Ok(ScalarText(v.to_owned())) }
    fn visit_string<E: de::Error>(self, v: String) -> Result<ScalarText, E> { Ok(ScalarText(v)) }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ScalarText, E> { Ok(ScalarText(v.to_string())) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ScalarText, E> { Ok(ScalarText(v.to_string())) }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ScalarText, E> { Ok(ScalarText(v.to_string())) }
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ScalarText, E> { Ok(ScalarText(v.to_string())) }
    fn visit_unit<E: de::Error>(self) -> Result<ScalarText, E> { Ok(ScalarText(String::new())) }
    fn visit_none<E: de::Error>(self) -> Result<ScalarText, E> { Ok(ScalarText(String::new())) }
}

/// The only field-level rule a new record has: a non-empty `Id`.
pub fn validate_new(user: &User) -> Result<(), ModelError> {
    if user.id.is_empty() {
        return Err(ModelError::Validation("Invalid user data.".into()));
    }
    Ok(())
}
