//! Parameter schemas and the coercion step that turns raw interaction option
//! values into validated, typed arguments before a handler runs.

use crate::types::error::{BotError, Result};
use crate::types::model::{MemberRef, RoleRef};
use std::collections::HashMap;
use std::fmt;

/// Option value as delivered by the gateway, before validation.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(MemberRef),
    Role(RoleRef),
}

impl RawValue {
    fn kind_name(&self) -> &'static str {
        match self {
            RawValue::String(_) => "string",
            RawValue::Integer(_) => "integer",
            RawValue::Number(_) => "number",
            RawValue::Boolean(_) => "boolean",
            RawValue::User(_) => "member",
            RawValue::Role(_) => "role",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    User,
    Role,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::User => "member",
            ParamType::Role => "role",
        };
        write!(f, "{}", name)
    }
}

/// A validated argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    User(MemberRef),
    Role(RoleRef),
}

#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub kind: ParamType,
    pub required: bool,
    pub default: Option<ArgValue>,
    pub choices: Vec<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// Longest accepted string, in characters.
    pub max_length: Option<usize>,
}

impl ParamSpec {
    pub fn new(kind: ParamType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: None,
            choices: Vec::new(),
            min: None,
            max: None,
            max_length: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ParamType::String, name, description)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ParamType::Integer, name, description)
    }

    pub fn user(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ParamType::User, name, description)
    }

    pub fn role(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ParamType::Role, name, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value used when the option is omitted. Only meaningful for optional params.
    #[cfg(test)]
    pub fn default_value(mut self, value: ArgValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn coerce(&self, raw: &RawValue) -> Result<ArgValue> {
        let value = match (self.kind, raw) {
            (ParamType::String, RawValue::String(s)) => ArgValue::String(s.clone()),
            (ParamType::String, RawValue::Integer(i)) => ArgValue::String(i.to_string()),
            (ParamType::String, RawValue::Boolean(b)) => ArgValue::String(b.to_string()),

            (ParamType::Integer, RawValue::Integer(i)) => ArgValue::Integer(*i),
            (ParamType::Integer, RawValue::Number(n))
                if n.is_finite()
                    && n.fract() == 0.0
                    && *n >= i64::MIN as f64
                    && *n <= i64::MAX as f64 =>
            {
                ArgValue::Integer(*n as i64)
            }
            (ParamType::Integer, RawValue::String(s)) => match s.trim().parse::<i64>() {
                Ok(i) => ArgValue::Integer(i),
                Err(_) => return Err(self.mismatch(raw)),
            },

            (ParamType::User, RawValue::User(m)) => ArgValue::User(m.clone()),
            (ParamType::Role, RawValue::Role(r)) => ArgValue::Role(r.clone()),

            _ => return Err(self.mismatch(raw)),
        };

        self.check_constraints(&value)?;
        Ok(value)
    }

    fn check_constraints(&self, value: &ArgValue) -> Result<()> {
        if let ArgValue::String(s) = value {
            if !self.choices.is_empty() && !self.choices.iter().any(|c| c == s) {
                return Err(BotError::invalid_argument(format!(
                    "Invalid choice for `{}`: {} (expected one of: {})",
                    self.name,
                    s,
                    self.choices.join(", ")
                )));
            }
            if let Some(max_length) = self.max_length {
                if s.chars().count() > max_length {
                    return Err(BotError::invalid_argument(format!(
                        "`{}` must be at most {} characters",
                        self.name, max_length
                    )));
                }
            }
        }

        if let ArgValue::Integer(i) = value {
            let below = self.min.is_some_and(|min| *i < min);
            let above = self.max.is_some_and(|max| *i > max);
            if below || above {
                return Err(BotError::invalid_argument(match (self.min, self.max) {
                    (Some(min), Some(max)) => {
                        format!("`{}` must be between {} and {}", self.name, min, max)
                    }
                    (Some(min), None) => format!("`{}` must be at least {}", self.name, min),
                    (None, Some(max)) => format!("`{}` must be at most {}", self.name, max),
                    (None, None) => unreachable!("range check without bounds"),
                }));
            }
        }

        Ok(())
    }

    fn mismatch(&self, raw: &RawValue) -> BotError {
        BotError::invalid_argument(format!(
            "Invalid value for `{}`: expected {}, got {}",
            self.name,
            self.kind,
            raw.kind_name()
        ))
    }
}

/// Arguments that passed schema validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    values: HashMap<String, ArgValue>,
}

impl Args {
    /// Validate `raw` against `schema`.
    ///
    /// Options not named in the schema are ignored. A missing required option
    /// without a default is an error.
    pub fn coerce(schema: &[ParamSpec], raw: &[(String, RawValue)]) -> Result<Self> {
        let mut values = HashMap::new();

        for spec in schema {
            match raw.iter().find(|(name, _)| *name == spec.name) {
                Some((_, value)) => {
                    values.insert(spec.name.clone(), spec.coerce(value)?);
                }
                None => match (&spec.default, spec.required) {
                    (Some(default), _) => {
                        values.insert(spec.name.clone(), default.clone());
                    }
                    (None, true) => {
                        return Err(BotError::invalid_argument(format!(
                            "Missing required argument `{}`",
                            spec.name
                        )));
                    }
                    (None, false) => {}
                },
            }
        }

        Ok(Self { values })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn optional_string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.optional_string(name).ok_or_else(|| missing(name))
    }

    pub fn optional_integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.optional_integer(name).ok_or_else(|| missing(name))
    }

    pub fn optional_user(&self, name: &str) -> Option<&MemberRef> {
        match self.values.get(name) {
            Some(ArgValue::User(m)) => Some(m),
            _ => None,
        }
    }

    pub fn user(&self, name: &str) -> Result<&MemberRef> {
        self.optional_user(name).ok_or_else(|| missing(name))
    }

    pub fn role(&self, name: &str) -> Result<&RoleRef> {
        match self.values.get(name) {
            Some(ArgValue::Role(r)) => Ok(r),
            _ => Err(missing(name)),
        }
    }
}

fn missing(name: &str) -> BotError {
    BotError::invalid_argument(format!("Missing required argument `{}`", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, value: RawValue) -> (String, RawValue) {
        (name.to_string(), value)
    }

    #[test]
    fn test_coerce_required_integers() {
        let schema = vec![
            ParamSpec::integer("first_value", "a").required(),
            ParamSpec::integer("second_value", "b").required(),
        ];
        let args = Args::coerce(
            &schema,
            &[
                raw("first_value", RawValue::Integer(2)),
                raw("second_value", RawValue::Integer(3)),
            ],
        )
        .unwrap();

        assert_eq!(args.integer("first_value").unwrap(), 2);
        assert_eq!(args.integer("second_value").unwrap(), 3);
    }

    #[test]
    fn test_missing_required_argument() {
        let schema = vec![ParamSpec::string("topic", "t").required()];
        let err = Args::coerce(&schema, &[]).unwrap_err();
        assert!(err.is_user_error());
        assert!(err.to_string().contains("Missing required argument `topic`"));
    }

    #[test]
    fn test_optional_argument_absent() {
        let schema = vec![ParamSpec::integer("comic_number", "n")];
        let args = Args::coerce(&schema, &[]).unwrap();
        assert!(args.is_empty());
        assert_eq!(args.optional_integer("comic_number"), None);
    }

    #[test]
    fn test_default_applied_when_absent() {
        let schema = vec![ParamSpec::string("mode", "m").default_value(ArgValue::String(
            "quiet".to_string(),
        ))];
        let args = Args::coerce(&schema, &[]).unwrap();
        assert_eq!(args.optional_string("mode"), Some("quiet"));
    }

    #[test]
    fn test_type_mismatch_is_invalid_argument() {
        let schema = vec![ParamSpec::integer("amount", "n").required()];
        let err = Args::coerce(&schema, &[raw("amount", RawValue::Boolean(true))]).unwrap_err();
        assert!(matches!(err, BotError::InvalidArgument { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid value for `amount`: expected integer, got boolean"
        );
    }

    #[test]
    fn test_integer_from_whole_number_and_numeric_string() {
        let schema = vec![ParamSpec::integer("n", "n").required()];

        let args = Args::coerce(&schema, &[raw("n", RawValue::Number(4.0))]).unwrap();
        assert_eq!(args.integer("n").unwrap(), 4);

        let args = Args::coerce(&schema, &[raw("n", RawValue::String(" -7 ".into()))]).unwrap();
        assert_eq!(args.integer("n").unwrap(), -7);

        assert!(Args::coerce(&schema, &[raw("n", RawValue::Number(4.5))]).is_err());
        assert!(Args::coerce(&schema, &[raw("n", RawValue::String("four".into()))]).is_err());
    }

    #[test]
    fn test_string_from_integer() {
        let schema = vec![ParamSpec::string("text", "t").required()];
        let args = Args::coerce(&schema, &[raw("text", RawValue::Integer(12))]).unwrap();
        assert_eq!(args.string("text").unwrap(), "12");
    }

    #[test]
    fn test_choices_enforced() {
        let schema = vec![ParamSpec::string("choice", "c")
            .required()
            .choices(&["add", "remove"])];

        assert!(Args::coerce(&schema, &[raw("choice", RawValue::String("add".into()))]).is_ok());

        let err = Args::coerce(&schema, &[raw("choice", RawValue::String("ban".into()))])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid choice for `choice`: ban (expected one of: add, remove)"
        );
    }

    #[test]
    fn test_range_enforced() {
        let schema = vec![ParamSpec::integer("amount", "n").required().range(1, 99)];

        assert!(Args::coerce(&schema, &[raw("amount", RawValue::Integer(1))]).is_ok());
        assert!(Args::coerce(&schema, &[raw("amount", RawValue::Integer(99))]).is_ok());

        let err = Args::coerce(&schema, &[raw("amount", RawValue::Integer(0))]).unwrap_err();
        assert_eq!(err.to_string(), "`amount` must be between 1 and 99");
        assert!(Args::coerce(&schema, &[raw("amount", RawValue::Integer(100))]).is_err());
    }

    #[test]
    fn test_max_length_counts_characters() {
        let schema = vec![ParamSpec::string("nickname", "n").max_length(4)];

        let args = Args::coerce(&schema, &[raw("nickname", RawValue::String("🦀🦀🦀🦀".into()))]);
        assert!(args.is_ok());

        let err = Args::coerce(&schema, &[raw("nickname", RawValue::String("crabs".into()))])
            .unwrap_err();
        assert!(matches!(err, BotError::InvalidArgument { .. }));
        assert_eq!(err.to_string(), "`nickname` must be at most 4 characters");
    }

    #[test]
    fn test_unknown_options_ignored() {
        let schema = vec![ParamSpec::string("topic", "t").required()];
        let args = Args::coerce(
            &schema,
            &[
                raw("topic", RawValue::String("rust".into())),
                raw("extra", RawValue::Integer(1)),
            ],
        )
        .unwrap();
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_user_and_role_values() {
        let member = MemberRef {
            id: 5,
            tag: "crab".into(),
            username: "crab".into(),
            display_name: "Crab".into(),
            avatar_url: None,
            joined_at: Some(1_600_000_000),
            color: None,
        };
        let role = RoleRef {
            id: 9,
            name: "Mods".into(),
        };
        let schema = vec![
            ParamSpec::role("rank", "r").required(),
            ParamSpec::user("member", "m").required(),
        ];
        let args = Args::coerce(
            &schema,
            &[
                raw("rank", RawValue::Role(role.clone())),
                raw("member", RawValue::User(member.clone())),
            ],
        )
        .unwrap();

        assert_eq!(args.role("rank").unwrap(), &role);
        assert_eq!(args.user("member").unwrap(), &member);

        let err = Args::coerce(&schema, &[raw("rank", RawValue::User(member))]).unwrap_err();
        assert!(err.to_string().contains("expected role, got member"));
    }
}
