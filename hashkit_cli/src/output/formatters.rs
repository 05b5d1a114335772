use super::{HashReport, OutputFormatter};
use anyhow::Result;
use colored::*;

/// Text formatter: one `algorithm: digest` line per digest
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_lines(&self, report: &HashReport, prefix: Option<&str>) -> String {
        let mut output = String::new();
        for (algorithm, digest) in report.digests.iter() {
            if let Some(prefix) = prefix {
                output.push_str(prefix);
                output.push_str(": ");
            }
            let algo_str = self.colorize(algorithm.id(), |s| s.yellow());
            let hash_str = self.colorize(&digest.to_hex(), |s| s.cyan());
            output.push_str(&format!("{algo_str}: {hash_str}\n"));
        }
        output
    }
}

impl OutputFormatter for TextFormatter {
    fn format_single(&self, report: &HashReport) -> Result<String> {
        Ok(self.format_lines(report, None))
    }

    fn format_batch(&self, reports: &[HashReport]) -> Result<String> {
        if let [report] = reports {
            return self.format_single(report);
        }
        // Several sources: prefix each line so the output stays greppable
        Ok(reports
            .iter()
            .map(|r| self.format_lines(r, Some(&r.source)))
            .collect())
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_single(&self, report: &HashReport) -> Result<String> {
        self.render(report)
    }

    fn format_batch(&self, reports: &[HashReport]) -> Result<String> {
        match reports {
            [report] => self.format_single(report),
            _ => self.render(reports),
        }
    }
}

/// CSV formatter: one row per source and algorithm
pub struct CsvFormatter;

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    const HEADERS: [&'static str; 4] = ["source", "size", "algorithm", "digest"];

    fn write_records<W: std::io::Write>(
        wtr: &mut csv::Writer<W>,
        report: &HashReport,
    ) -> Result<()> {
        let size = report.size.to_string();
        for (algorithm, digest) in report.digests.iter() {
            wtr.write_record([
                report.source.as_str(),
                size.as_str(),
                algorithm.id(),
                digest.to_hex().as_str(),
            ])?;
        }
        Ok(())
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_single(&self, report: &HashReport) -> Result<String> {
        self.format_batch(std::slice::from_ref(report))
    }

    fn format_batch(&self, reports: &[HashReport]) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(Self::HEADERS)?;

        for report in reports {
            Self::write_records(&mut wtr, report)?;
        }

        let data = wtr.into_inner()?;
        Ok(String::from_utf8(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashkit_core::{Algorithm, EngineConfig, hash_reader};

    fn report(source: &str, data: &[u8]) -> HashReport {
        let config = EngineConfig::with_algorithms([Algorithm::Sha512, Algorithm::Fnv1a]);
        HashReport {
            source: source.to_string(),
            size: data.len() as u64,
            digests: hash_reader(data, &config).unwrap(),
        }
    }

    #[test]
    fn test_text_single_and_batch() {
        let formatter = TextFormatter::new(false);
        let single = formatter.format_single(&report("a.bin", b"abc")).unwrap();
        let lines: Vec<_> = single.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("sha512: ddaf35a1"));
        assert!(lines[1].starts_with("fnv1a: "));

        let batch = formatter
            .format_batch(&[report("a.bin", b"abc"), report("b.bin", b"")])
            .unwrap();
        assert_eq!(batch.lines().count(), 4);
        assert!(batch.lines().nth(2).unwrap().starts_with("b.bin: sha512: cf83e135"));
    }

    #[test]
    fn test_json_keeps_engine_order() {
        let json = JsonFormatter::new(false)
            .format_single(&report("-", b"abc"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "-");
        assert_eq!(value["size"], 3);
        assert!(value["digests"]["sha512"].as_str().unwrap().starts_with("ddaf35a1"));

        let batch = JsonFormatter::new(true)
            .format_batch(&[report("a", b"1"), report("b", b"2")])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&batch).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_csv_has_one_row_per_digest() {
        let csv = CsvFormatter::new()
            .format_batch(&[report("a", b"1"), report("b", b"2")])
            .unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "source,size,algorithm,digest");
        assert_eq!(lines.count(), 4);
    }
}
