//! Render a [`SqlPredicate`] to parameterized SQL text.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::expr::SqlPredicate;

/// Bind-parameter style of the target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// `$1`, `$2`, ... (PostgreSQL)
    #[default]
    Postgres,
    /// `?` (SQLite, MySQL)
    Question,
}

impl FromStr for Placeholder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "numbered" => Ok(Placeholder::Postgres),
            "question" | "qmark" | "?" => Ok(Placeholder::Question),
            other => Err(format!(
                "unknown placeholder style '{}' (expected 'postgres' or 'question')",
                other
            )),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Postgres => f.write_str("postgres"),
            Placeholder::Question => f.write_str("question"),
        }
    }
}

/// SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

struct Renderer {
    placeholder: Placeholder,
    params: Vec<Value>,
}

impl Renderer {
    fn bind(&mut self, value: &Value) -> String {
        self.params.push(value.clone());
        match self.placeholder {
            Placeholder::Postgres => format!("${}", self.params.len()),
            Placeholder::Question => "?".to_string(),
        }
    }

    fn render(&mut self, pred: &SqlPredicate) -> String {
        match pred {
            SqlPredicate::Const(true) => "TRUE".to_string(),
            SqlPredicate::Const(false) => "FALSE".to_string(),
            SqlPredicate::Compare { column, op, value } => {
                let param = self.bind(value);
                format!("{} {} {}", column, op, param)
            }
            SqlPredicate::IsNull { column, negated } => {
                if *negated {
                    format!("{} IS NOT NULL", column)
                } else {
                    format!("{} IS NULL", column)
                }
            }
            SqlPredicate::InList { column, values } => {
                let params: Vec<String> = values.iter().map(|v| self.bind(v)).collect();
                format!("{} IN ({})", column, params.join(", "))
            }
            SqlPredicate::And(parts) => self.render_group(parts, "AND", "TRUE"),
            SqlPredicate::Or(parts) => self.render_group(parts, "OR", "FALSE"),
            SqlPredicate::Not(inner) => {
                let body = self.render(inner);
                if is_grouped(inner) {
                    format!("NOT {}", body)
                } else {
                    format!("NOT ({})", body)
                }
            }
        }
    }

    fn render_group(&mut self, parts: &[SqlPredicate], joiner: &str, empty: &str) -> String {
        match parts {
            [] => empty.to_string(),
            [only] => self.render(only),
            _ => {
                let rendered: Vec<String> = parts.iter().map(|p| self.render(p)).collect();
                format!("({})", rendered.join(&format!(" {} ", joiner)))
            }
        }
    }
}

/// Already wrapped in parentheses when rendered.
fn is_grouped(pred: &SqlPredicate) -> bool {
    match pred {
        SqlPredicate::And(parts) | SqlPredicate::Or(parts) => match parts.as_slice() {
            [] => false,
            [only] => is_grouped(only),
            _ => true,
        },
        _ => false,
    }
}

impl SqlPredicate {
    /// Render to SQL with values bound as parameters.
    pub fn to_sql(&self, placeholder: Placeholder) -> SqlFragment {
        let mut renderer = Renderer {
            placeholder,
            params: Vec::new(),
        };
        let sql = renderer.render(self);
        SqlFragment {
            sql,
            params: renderer.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use rowguard_core::{ColumnPredicate, CompareOp, Predicate};
    use serde_json::json;

    use super::*;
    use crate::column::SqlColumn;

    fn col(name: &str) -> SqlColumn {
        SqlColumn::new("sites", name)
    }

    fn eq(name: &str, value: Value) -> SqlPredicate {
        SqlPredicate::compare(&col(name), CompareOp::Eq, &value)
    }

    #[test]
    fn constants() {
        assert_eq!(SqlPredicate::always_true().to_sql(Placeholder::Postgres).sql, "TRUE");
        assert_eq!(SqlPredicate::always_false().to_sql(Placeholder::Postgres).sql, "FALSE");
        assert_eq!(SqlPredicate::all(vec![]).to_sql(Placeholder::Postgres).sql, "TRUE");
        assert_eq!(SqlPredicate::any(vec![]).to_sql(Placeholder::Postgres).sql, "FALSE");
    }

    #[test]
    fn numbered_placeholders_follow_render_order() {
        let pred = SqlPredicate::all(vec![
            SqlPredicate::any(vec![eq("owner_id", json!("user1")), eq("is_public", json!(true))]),
            eq("archived", json!(true)).negate(),
        ]);
        let frag = pred.to_sql(Placeholder::Postgres);
        assert_eq!(
            frag.sql,
            r#"(("sites"."owner_id" = $1 OR "sites"."is_public" = $2) AND NOT ("sites"."archived" = $3))"#
        );
        assert_eq!(frag.params, vec![json!("user1"), json!(true), json!(true)]);
    }

    #[test]
    fn question_placeholders() {
        let pred = SqlPredicate::one_of(&col("category"), &[json!("tech"), json!("news")]);
        let frag = pred.to_sql(Placeholder::Question);
        assert_eq!(frag.sql, r#""sites"."category" IN (?, ?)"#);
        assert_eq!(frag.params.len(), 2);
    }

    #[test]
    fn single_part_groups_are_not_wrapped() {
        let pred = SqlPredicate::any(vec![SqlPredicate::all(vec![eq("id", json!(1))])]);
        assert_eq!(pred.to_sql(Placeholder::Postgres).sql, r#""sites"."id" = $1"#);
    }

    #[test]
    fn negated_group_keeps_single_parentheses() {
        let pred = SqlPredicate::any(vec![eq("id", json!(1)), eq("id", json!(2))]).negate();
        assert_eq!(
            pred.to_sql(Placeholder::Postgres).sql,
            r#"NOT ("sites"."id" = $1 OR "sites"."id" = $2)"#
        );
    }

    #[test]
    fn null_tests_bind_nothing() {
        let pred = SqlPredicate::compare(&col("owner_id"), CompareOp::Ne, &Value::Null);
        let frag = pred.to_sql(Placeholder::Postgres);
        assert_eq!(frag.sql, r#""sites"."owner_id" IS NOT NULL"#);
        assert!(frag.params.is_empty());
    }

    #[test]
    fn placeholder_parsing() {
        assert_eq!("postgres".parse::<Placeholder>(), Ok(Placeholder::Postgres));
        assert_eq!("Question".parse::<Placeholder>(), Ok(Placeholder::Question));
        assert!("colon".parse::<Placeholder>().is_err());
    }

    #[test]
    fn fragment_serializes_sql_and_params() {
        let frag = eq("views", json!(100)).to_sql(Placeholder::Postgres);
        let value = serde_json::to_value(&frag).unwrap();
        assert_eq!(value["sql"], r#""sites"."views" = $1"#);
        assert_eq!(value["params"], json!([100]));
    }
}
