// src/render.rs

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::invert::InvertedMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Header line, then each member followed by its numbered keys
    #[default]
    Text,
    Json,
    Yaml,
    /// Two columns; the keys cell is newline-separated
    Csv,
}

/// Column titles for the text and CSV outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHeaders {
    pub member: String,
    pub keys: String,
}

impl Default for DisplayHeaders {
    fn default() -> Self {
        Self {
            member: "メールアドレス".into(),
            keys: "メーリングリスト".into(),
        }
    }
}

pub fn render(map: &InvertedMap, format: Format, headers: &DisplayHeaders) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(map, headers)),
        Format::Json => {
            let mut out = serde_json::to_string_pretty(map).context("serializing JSON")?;
            out.push('\n');
            Ok(out)
        }
        Format::Yaml => serde_yaml::to_string(map).context("serializing YAML"),
        Format::Csv => render_csv(map, headers),
    }
}

fn render_text(map: &InvertedMap, headers: &DisplayHeaders) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = writeln!(out, "{}\t{}", headers.member, headers.keys);
    for (member, keys) in map {
        let _ = writeln!(out, "{}", member);
        for (i, key) in keys.iter().enumerate() {
            let _ = writeln!(out, "\t{}. {}", i + 1, key);
        }
    }
    out
}

fn render_csv(map: &InvertedMap, headers: &DisplayHeaders) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([&headers.member, &headers.keys])
        .context("writing CSV header")?;
    for (member, keys) in map {
        wtr.write_record([member.as_str(), keys.join("\n").as_str()])
            .with_context(|| format!("writing CSV record for {}", member))?;
    }
    let bytes = wtr.into_inner().context("flushing CSV")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invert::{invert, ColumnSpec, Table};
    use crate::load::parse_table;

    fn sample() -> InvertedMap {
        let table = Table::new(
            vec!["MLアドレス".into(), "MLメンバー".into()],
            vec![
                vec!["list1@x".into(), "a@x\nb@x".into()],
                vec!["list2@x".into(), "b@x".into()],
            ],
        );
        invert(&table, &ColumnSpec::new("MLアドレス", "MLメンバー")).unwrap()
    }

    #[test]
    fn text_output() -> Result<()> {
        let out = render(&sample(), Format::Text, &DisplayHeaders::default())?;
        assert_eq!(
            out,
            "メールアドレス\tメーリングリスト\na@x\n\t1. list1@x\nb@x\n\t1. list1@x\n\t2. list2@x\n"
        );
        Ok(())
    }

    #[test]
    fn text_output_for_empty_map_is_header_only() -> Result<()> {
        let headers = DisplayHeaders {
            member: "member".into(),
            keys: "lists".into(),
        };
        let out = render(&InvertedMap::default(), Format::Text, &headers)?;
        assert_eq!(out, "member\tlists\n");
        Ok(())
    }

    #[test]
    fn json_output_keeps_member_order() -> Result<()> {
        let out = render(&sample(), Format::Json, &DisplayHeaders::default())?;
        let value: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(value["b@x"], serde_json::json!(["list1@x", "list2@x"]));
        assert!(out.find("a@x").unwrap() < out.find("b@x").unwrap());
        Ok(())
    }

    #[test]
    fn yaml_output() -> Result<()> {
        let out = render(&sample(), Format::Yaml, &DisplayHeaders::default())?;
        let parsed: std::collections::BTreeMap<String, Vec<String>> = serde_yaml::from_str(&out)?;
        assert_eq!(parsed, sample().into_inner());
        Ok(())
    }

    #[test]
    fn csv_output_can_be_inverted_back() -> Result<()> {
        let out = render(&sample(), Format::Csv, &DisplayHeaders::default())?;
        let table = parse_table(&out)?;
        assert_eq!(table.headers, vec!["メールアドレス", "メーリングリスト"]);

        let back = invert(&table, &ColumnSpec::new("メールアドレス", "メーリングリスト"))?;
        assert_eq!(back.get("list1@x"), Some(&["a@x".to_string(), "b@x".to_string()][..]));
        assert_eq!(back.get("list2@x"), Some(&["b@x".to_string()][..]));
        Ok(())
    }
}
