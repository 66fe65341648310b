use prometheus::{IntCounterVec, Opts, Registry};

/// Counters a GitHub event server reports through.
///
/// Nothing is registered globally; call [`Metrics::register`] with the
/// registry the process exports.
#[derive(Clone)]
pub struct Metrics {
    /// Webhooks received, by `event_type`.
    pub webhook_counter: IntCounterVec,
    /// Responses sent back to GitHub, by `response_code`.
    pub response_counter: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let webhook_counter = IntCounterVec::new(
            Opts::new("prow_webhook_counter", "A counter of the webhooks made to prow."),
            &["event_type"],
        )?;
        let response_counter = IntCounterVec::new(
            Opts::new(
                "prow_webhook_response_codes",
                "A counter of the different responses hook has responded to webhooks with.",
            ),
            &["response_code"],
        )?;

        Ok(Self {
            webhook_counter,
            response_counter,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.webhook_counter.clone()))?;
        registry.register(Box::new(self.response_counter.clone()))?;
        Ok(())
    }

    pub fn record_webhook(&self, event_type: &str) {
        self.webhook_counter.with_label_values(&[event_type]).inc();
    }

    pub fn record_response(&self, code: u16) {
        let code = code.to_string();
        self.response_counter
            .with_label_values(&[code.as_str()])
            .inc();
    }
}
