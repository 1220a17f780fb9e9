//! Renders metric samples in the Prometheus text exposition format.
//!
//! Samples sharing a name are grouped into one family. Families appear in the order their first sample was emitted,
//! and samples keep their emission order within a family.

use logstash_exporter_collectors::{
    MetricKind,
    MetricSample,
};
use prometheus::{
    proto::{
        Counter,
        Gauge,
        LabelPair,
        Metric,
        MetricFamily,
        MetricType,
    },
    Encoder,
    TextEncoder,
};
use std::collections::HashMap;

/// Content type of [`encode`]'s output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

pub fn encode(samples: &[MetricSample]) -> Result<String, prometheus::Error> {
    let families = families(samples);
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

fn families(samples: &[MetricSample]) -> Vec<MetricFamily> {
    let mut families: Vec<MetricFamily> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        let position = *index.entry(sample.name()).or_insert_with(|| {
            families.push(family(sample));
            families.len() - 1
        });
        families[position].mut_metric().push(metric(sample));
    }

    families
}

fn family(sample: &MetricSample) -> MetricFamily {
    let mut family = MetricFamily::default();
    family.set_name(sample.name().to_string());
    family.set_help(sample.help().to_string());
    family.set_field_type(match sample.kind() {
        MetricKind::Counter => MetricType::COUNTER,
        MetricKind::Gauge => MetricType::GAUGE,
    });
    family
}

fn metric(sample: &MetricSample) -> Metric {
    let mut metric = Metric::default();
    for (name, value) in sample.labels() {
        let mut pair = LabelPair::default();
        pair.set_name(name.clone());
        pair.set_value(value.clone());
        metric.mut_label().push(pair);
    }

    match sample.kind() {
        MetricKind::Counter => {
            let mut counter = Counter::default();
            counter.set_value(sample.value());
            metric.set_counter(counter);
        }
        MetricKind::Gauge => {
            let mut gauge = Gauge::default();
            gauge.set_value(sample.value());
            metric.set_gauge(gauge);
        }
    }
    metric
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn samples() -> Vec<MetricSample> {
        vec![
            MetricSample::gauge("logstash_exporter_collector_up", 1.0, "Collector outcome.")
                .with_label("collector", "nodeinfo"),
            MetricSample::counter("logstash_stats_events_in", 42.0, "Events received."),
            MetricSample::gauge("logstash_exporter_collector_up", 0.0, "Collector outcome.")
                .with_label("collector", "nodestats"),
        ]
    }

    #[test]
    fn groups_samples_into_families_by_first_appearance() {
        let families = families(&samples());

        let names: Vec<_> = families.iter().map(MetricFamily::get_name).collect();
        assert_eq!(names, ["logstash_exporter_collector_up", "logstash_stats_events_in"]);
        assert_eq!(families[0].get_metric().len(), 2);
        assert_eq!(families[1].get_field_type(), MetricType::COUNTER);
    }

    #[test]
    fn renders_the_text_format() {
        let text = encode(&samples()).unwrap();

        assert!(text.contains("# TYPE logstash_exporter_collector_up gauge\n"));
        assert!(text.contains("logstash_exporter_collector_up{collector=\"nodeinfo\"} 1\n"));
        assert!(text.contains("logstash_exporter_collector_up{collector=\"nodestats\"} 0\n"));
        assert!(text.contains("# TYPE logstash_stats_events_in counter\n"));
        assert!(text.contains("logstash_stats_events_in 42\n"));
        assert_eq!(text.matches("# TYPE logstash_exporter_collector_up").count(), 1);
    }

    #[test]
    fn no_samples_render_an_empty_body() {
        assert_eq!(encode(&[]).unwrap(), "");
    }
}
