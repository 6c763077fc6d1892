use std::fs;

use log::{debug, info, warn};
use serde_json::json;
use snafu::whatever;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::msi::*;

fn item_stats_to_json(is: &ItemStats) -> JSValue {
    let s = &is.stats;
    json!({
        "item": is.name,
        "reversed": is.reversed,
        "n": s.n,
        "excluded": s.excluded,
        "frequency": s.frequency,
        "proportion": s.proportion,
        "cumulative": s.cumulative,
        "midpoint": s.midpoint,
        "complement": s.complement,
        "z": s.z,
        "zc": s.zc,
        "rounded": s.rounded,
    })
}

/// The statistics of every item, in input order.
pub fn build_summary_js(report: &Report) -> JSValue {
    let items: Vec<JSValue> = report.items.iter().map(item_stats_to_json).collect();
    json!({ "items": items })
}

pub fn summary_bytes(summary: &JSValue) -> MsiResult<Vec<u8>> {
    let pretty = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    Ok(pretty.into_bytes())
}

pub fn read_summary(path: &str) -> MsiResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Compares the computed statistics with the summary of a previous run.
pub fn check_reference(path: &str, summary: &JSValue) -> MsiResult<()> {
    let summary_ref = read_summary(path)?;
    info!("Checking the statistics against the reference '{}'", path);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_js_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let items = vec![
            Item::from_values("Q1", &[1, 1, 2, 3, 3, 3, 4, 5, 5, 5]),
            Item::new("Q2", &[Some(2), Some(7), None, Some(4)]),
        ];
        build_report(&items, &["Q2".to_string()], &mut NoReporter).unwrap()
    }

    #[test]
    fn summary_fields() {
        let js = build_summary_js(&sample_report());
        let items = js["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["item"], "Q1");
        assert_eq!(items[0]["reversed"], false);
        assert_eq!(items[0]["frequency"], json!([2, 1, 3, 1, 3]));
        assert_eq!(items[0]["rounded"], json!([0, 1, 1, 2, 2]));
        assert_eq!(items[1]["reversed"], true);
        assert_eq!(items[1]["n"], 2);
        assert_eq!(items[1]["excluded"], 1);
        // 2 -> 4 and 4 -> 2 after reverse coding
        assert_eq!(items[1]["frequency"], json!([0, 1, 0, 1, 0]));
    }

    #[test]
    fn reference_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("ref.json").display().to_string();
        let js = build_summary_js(&sample_report());
        fs::write(&p, summary_bytes(&js).unwrap()).unwrap();
        check_reference(&p, &js).unwrap();

        let other = build_summary_js(
            &build_report(
                &[Item::from_values("Q1", &[1, 2, 3])],
                &[],
                &mut NoReporter,
            )
            .unwrap(),
        );
        assert!(check_reference(&p, &other).is_err());
        assert!(check_reference(&format!("{}.missing", p), &js).is_err());
    }
}
