use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        amount_cents: i64,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example {
            id: "exp-1",
            amount_cents: 12_500,
        };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "exp-1");
        assert_eq!(parsed["amount_cents"], 12_500);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = vec![
            Example {
                id: "exp-1",
                amount_cents: 1,
            },
            Example {
                id: "exp-2",
                amount_cents: 2,
            },
        ];
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed[1]["id"], "exp-2");
        assert!(!out.contains('\n'));
    }
}
