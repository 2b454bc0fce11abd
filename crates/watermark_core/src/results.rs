/// One watermarked file as reported by the embed endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedResult {
    pub filename: String,
    /// Service-issued reference, resolved against the configured origin.
    pub download_ref: String,
    pub rms: f64,
    /// Scale-invariant SNR in dB.
    pub si_snr: f64,
}

/// One detection verdict as reported by the detect endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectResult {
    pub filename: String,
    /// In `[0, 1]`.
    pub probability: f64,
    /// Authoritative verdict; never recomputed from `probability`.
    pub is_watermarked: bool,
}
