//! Parser for keymap-level `config.h` files
//!
//! Only what a keymap override header needs is understood: object-like `#define`s,
//! `#undef`, `#pragma once`, comments and line continuations. Conditionals and includes
//! are a parse error, they belong to the firmware framework's own headers.

use std::str::FromStr;

use log::debug;
use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::error::{ConfigError, ConfigResult};
use crate::flag::{EncodingPrefix, Flag, FlagValue, IntLiteral, StrLiteral};
use crate::flag_set::FlagSet;

// Pest parser using the grammar file
#[derive(Parser)]
#[grammar = "header.pest"]
struct HeaderParser;

/// Parse `config.h` contents into a [`FlagSet`].
///
/// `source_name` is only used in error messages.
pub fn parse_header(source: &str, source_name: &str) -> ConfigResult<FlagSet> {
    let mut flags = FlagSet::new();
    let mut pairs = HeaderParser::parse(Rule::file, source).map_err(|e| to_config_error(e, source_name))?;
    let Some(file) = pairs.next() else {
        return Ok(flags);
    };

    for directive in file.into_inner() {
        match directive.as_rule() {
            Rule::define => {
                let flag = parse_define(directive);
                debug!("{}: {}", source_name, flag);
                flags.insert(flag)?;
            }
            Rule::undef => {
                let name = directive
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::name)
                    .map(|p| p.as_str())
                    .unwrap_or_default();
                if flags.undefine(name).is_none() {
                    debug!("{}: #undef {} has no matching #define", source_name, name);
                }
            }
            _ => {}
        }
    }

    Ok(flags)
}

/// Parse a lone replacement text, e.g. `0xFF60` or `u8"version"`.
///
/// Returns `None` for an empty (presence-only) value.
pub fn parse_value(text: &str) -> ConfigResult<Option<FlagValue>> {
    let mut pairs = HeaderParser::parse(Rule::value_only, text).map_err(|e| to_config_error(e, text))?;
    Ok(pairs
        .next()
        .and_then(|value_only| value_only.into_inner().find(|p| p.as_rule() != Rule::EOI))
        .map(to_flag_value))
}

fn parse_define(pair: Pair<Rule>) -> Flag {
    let mut name = String::new();
    let mut value = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::name => name = inner.as_str().to_string(),
            Rule::string | Rule::integer | Rule::expr => value = Some(to_flag_value(inner)),
            _ => {}
        }
    }
    Flag { name, value }
}

fn to_flag_value(pair: Pair<Rule>) -> FlagValue {
    let text = pair.as_str().trim_end();
    match pair.as_rule() {
        Rule::integer => IntLiteral::parse(text)
            .map(FlagValue::Integer)
            .unwrap_or_else(|| FlagValue::Expr(text.to_string())),
        Rule::string => {
            let mut prefix = None;
            let mut body = "";
            for inner in pair.clone().into_inner() {
                match inner.as_rule() {
                    Rule::prefix => prefix = EncodingPrefix::from_str(inner.as_str()).ok(),
                    Rule::body => body = inner.as_str(),
                    _ => {}
                }
            }
            match StrLiteral::unescape(body) {
                Some(value) => FlagValue::String(StrLiteral { value, prefix }),
                None => FlagValue::Expr(text.to_string()),
            }
        }
        _ => FlagValue::Expr(text.to_string()),
    }
}

fn to_config_error(e: pest::error::Error<Rule>, source_name: &str) -> ConfigError {
    let (line, column) = match e.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    ConfigError::HeaderParse {
        source_name: source_name.to_string(),
        line,
        column,
        message: e.variant.message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::Radix;

    fn value_of<'a>(flags: &'a FlagSet, name: &str) -> Option<&'a FlagValue> {
        flags.get(name).and_then(|f| f.value.as_ref())
    }

    #[test]
    fn test_parse_presence_and_values() {
        let flags = parse_header(
            "#define ORYX_CONFIGURATOR\n#define USB_SUSPEND_WAKEUP_DELAY 0\n#define RAW_USAGE_PAGE 0xFF60\n",
            "config.h",
        )
        .unwrap();
        assert_eq!(flags.len(), 3);
        assert_eq!(flags.get("ORYX_CONFIGURATOR").unwrap().value, None);
        let delay = value_of(&flags, "USB_SUSPEND_WAKEUP_DELAY").unwrap().as_integer().unwrap();
        assert_eq!(delay.value(), 0);
        assert_eq!(delay.radix(), Radix::Decimal);
        let page = value_of(&flags, "RAW_USAGE_PAGE").unwrap().as_integer().unwrap();
        assert_eq!(page.value(), 0xFF60);
        assert_eq!(page.text(), "0xFF60");
    }

    #[test]
    fn test_parse_string_with_prefix() {
        let flags = parse_header("#define FIRMWARE_VERSION u8\"lzxz0/AZjZE\"", "config.h").unwrap();
        let version = value_of(&flags, "FIRMWARE_VERSION").unwrap().as_str().unwrap();
        assert_eq!(version.value, "lzxz0/AZjZE");
        assert_eq!(version.prefix, Some(EncodingPrefix::Utf8));

        let flags = parse_header("#define PRODUCT \"Ergo \\\"EZ\\\"\"\n", "config.h").unwrap();
        let product = value_of(&flags, "PRODUCT").unwrap().as_str().unwrap();
        assert_eq!(product.value, "Ergo \"EZ\"");
        assert_eq!(product.prefix, None);
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let source = "/*\n  Set any config.h overrides here.\n*/\n\n#define A // trailing\n  #define B /* inline */ 1\n\n// line\n#define C\n";
        let flags = parse_header(source, "config.h").unwrap();
        let names: Vec<&str> = flags.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(flags.get("A").unwrap().value, None);
        assert_eq!(value_of(&flags, "B").unwrap().as_integer().unwrap().value(), 1);
    }

    #[test]
    fn test_parse_expressions_stay_opaque() {
        let flags = parse_header(
            "#define TAPPING_TERM 200 + 5\n#define MASK (1 << 3)\n#define NEG -1\n#define HEXESC \"\\x41\"\n",
            "config.h",
        )
        .unwrap();
        assert_eq!(
            value_of(&flags, "TAPPING_TERM"),
            Some(&FlagValue::Expr("200 + 5".to_string()))
        );
        assert_eq!(value_of(&flags, "MASK"), Some(&FlagValue::Expr("(1 << 3)".to_string())));
        assert_eq!(value_of(&flags, "NEG"), Some(&FlagValue::Expr("-1".to_string())));
        assert_eq!(value_of(&flags, "HEXESC"), Some(&FlagValue::Expr("\"\\x41\"".to_string())));
    }

    #[test]
    fn test_parse_expression_with_comment_markers() {
        let source = "#define URL_FN make(\"http://example.com\")\n#define SLASH '/' // slash\n#define X 1 /* c */ 2\n#define Y 5 /* five */\n#define Z a /* tail */\n";
        let flags = parse_header(source, "config.h").unwrap();
        assert_eq!(
            value_of(&flags, "URL_FN"),
            Some(&FlagValue::Expr("make(\"http://example.com\")".to_string()))
        );
        assert_eq!(value_of(&flags, "SLASH"), Some(&FlagValue::Expr("'/'".to_string())));
        assert_eq!(value_of(&flags, "X"), Some(&FlagValue::Expr("1 /* c */ 2".to_string())));
        assert_eq!(value_of(&flags, "Y").unwrap().as_integer().unwrap().value(), 5);
        assert_eq!(value_of(&flags, "Z"), Some(&FlagValue::Expr("a".to_string())));

        let reparsed = parse_header(&flags.to_header(), "config.h").unwrap();
        assert_eq!(flags, reparsed);
    }

    #[test]
    fn test_parse_undef_and_pragma() {
        let source = "#pragma once\n#define TAPPING_TERM 175\n#undef TAPPING_TERM\n#define TAPPING_TERM 200\n#undef NEVER_DEFINED\n";
        let flags = parse_header(source, "config.h").unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(value_of(&flags, "TAPPING_TERM").unwrap().as_integer().unwrap().value(), 200);
    }

    #[test]
    fn test_parse_duplicate_is_error() {
        let err = parse_header("#define DOUBLE_REPORT\n#define DOUBLE_REPORT\n", "config.h").unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateDefinition {
                name: "DOUBLE_REPORT".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unsupported_directive_is_error() {
        let err = parse_header("#define A\n#ifdef A\n#endif\n", "keymap/config.h").unwrap_err();
        match err {
            ConfigError::HeaderParse { source_name, line, .. } => {
                assert_eq!(source_name, "keymap/config.h");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse_header("#define F(x) x\n", "config.h").is_err());
        assert!(parse_header("DOUBLE_REPORT\n", "config.h").is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(
            parse_value("0x61").unwrap(),
            Some(FlagValue::Integer(IntLiteral::hex(0x61)))
        );
        assert_eq!(
            parse_value("u8\"abc\"").unwrap(),
            Some(FlagValue::String(StrLiteral::utf8("abc")))
        );
        assert_eq!(parse_value("TAPPING_TERM + 1").unwrap(), Some(FlagValue::Expr("TAPPING_TERM + 1".to_string())));
        assert_eq!(parse_value("").unwrap(), None);
        assert!(parse_value("1\n2").is_err());
    }

    #[test]
    fn test_render_then_reparse() {
        let source = "#define A\n#define B 0x10U\n#define C L\"wide\"\n#define D 1 << \\\n  2\n";
        let flags = parse_header(source, "config.h").unwrap();
        let reparsed = parse_header(&flags.to_header(), "config.h").unwrap();
        assert_eq!(flags, reparsed);
    }
}
