//! Rendering of collected samples in the Prometheus text format.

use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashSet;
use tracing::warn;

use crate::collector::{MetricKind, MetricSample};
use crate::errors::{ExporterError, Result};

/// Content type of [`encode`]'s output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Group samples into metric families.
///
/// A throwaway registry is built for every call, so nothing survives between
/// scrapes. Samples sharing a name end up in one family; the first sample of
/// a name fixes its kind, help text and label names. A repeated label set
/// keeps its first value, whatever the kind.
pub fn gather_samples(samples: &[MetricSample]) -> Result<Vec<MetricFamily>> {
    let mut groups: Vec<(&MetricSample, Vec<&MetricSample>)> = Vec::new();
    for sample in samples {
        match groups.iter_mut().find(|(head, _)| head.name == sample.name) {
            Some((_, members)) => members.push(sample),
            None => groups.push((sample, vec![sample])),
        }
    }

    let registry = Registry::new();
    for (head, members) in groups {
        let opts = Opts::new(head.name, head.help);
        let label_names = head.label_names();

        let mut series = Vec::with_capacity(members.len());
        let mut seen = HashSet::new();
        for sample in members {
            check_labels(head, sample)?;
            let values = sample.label_values();
            if seen.insert(values.clone()) {
                series.push((values, sample.value));
            } else {
                warn!(
                    "Dropping duplicate series {}{{{}}}",
                    head.name,
                    values.join(",")
                );
            }
        }

        match head.kind {
            MetricKind::Gauge => {
                let family = GaugeVec::new(opts, &label_names)?;
                for (values, value) in series {
                    family.with_label_values(&values).set(value);
                }
                registry.register(Box::new(family))?;
            }
            MetricKind::Counter => {
                let family = CounterVec::new(opts, &label_names)?;
                for (values, value) in series {
                    // 计数器不能为负
                    family.with_label_values(&values).inc_by(value.max(0.0));
                }
                registry.register(Box::new(family))?;
            }
        }
    }

    Ok(registry.gather())
}

fn check_labels(head: &MetricSample, sample: &MetricSample) -> Result<()> {
    if head.kind != sample.kind {
        return Err(ExporterError::exposition(format!(
            "samples of '{}' disagree on type: {} vs {}",
            head.name,
            head.kind.as_str(),
            sample.kind.as_str()
        )));
    }
    if head.label_names() != sample.label_names() {
        return Err(ExporterError::exposition(format!(
            "samples of '{}' disagree on label names",
            head.name
        )));
    }
    Ok(())
}

/// Encode metric families in the text exposition format.
pub fn encode(families: &[MetricFamily]) -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ExporterError::exposition(format!("metrics output is not valid UTF-8: {}", e)))
}

/// Samples followed by any extra families (the exporter's own metrics).
pub fn render(samples: &[MetricSample], extra: Vec<MetricFamily>) -> Result<String> {
    let mut families = gather_samples(samples)?;
    families.extend(extra);
    encode(&families)
}
