/// Per-epoch statistics returned by `train_loop`.
#[derive(Debug, Clone)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean per-sample loss observed while the parameters were being updated.
    pub train_loss: f64,
    /// Mean loss over the full dataset after the epoch finished.
    pub eval_loss: f64,
    /// Fraction of samples whose arg-max prediction matches their class.
    pub accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
