//! The operation registry.
//!
//! Every primitive is bound to a stable ASCII name; the table below is what
//! the engine hands to the host at startup so a bridge can bind its own
//! calling convention to the names. The set is closed: names are never
//! reused or renamed.

/// All host-visible operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    AllocateSampleMemory,
    ReallocateSampleMemory,
    DeallocateSampleMemory,
    SetSamples,
    Copy,
    ChangeGain,
    MixIn,
    MixInPan,
    MultiplyIn,
    Standardize,
    WavetableIn,
    WaveModIn,
    Delay,
    Biquad,
    OnePole,
    Envelope,
    Overdrive,
    Clip,
    Normalize,
    WriteBytes,
    WriteWavBytes,
    ReadWavBytes,
}

/// Registry order; also the order the table is handed to the host.
pub const OPERATIONS: [Op; 22] = [
    Op::AllocateSampleMemory,
    Op::ReallocateSampleMemory,
    Op::DeallocateSampleMemory,
    Op::SetSamples,
    Op::Copy,
    Op::ChangeGain,
    Op::MixIn,
    Op::MixInPan,
    Op::MultiplyIn,
    Op::Standardize,
    Op::WavetableIn,
    Op::WaveModIn,
    Op::Delay,
    Op::Biquad,
    Op::OnePole,
    Op::Envelope,
    Op::Overdrive,
    Op::Clip,
    Op::Normalize,
    Op::WriteBytes,
    Op::WriteWavBytes,
    Op::ReadWavBytes,
];

impl Op {
    pub fn name(self) -> &'static str {
        match self {
            Op::AllocateSampleMemory => "allocateSampleMemory",
            Op::ReallocateSampleMemory => "reallocateSampleMemory",
            Op::DeallocateSampleMemory => "deallocateSampleMemory",
            Op::SetSamples => "setSamples",
            Op::Copy => "copy",
            Op::ChangeGain => "changeGain",
            Op::MixIn => "mixIn",
            Op::MixInPan => "mixInPan",
            Op::MultiplyIn => "multiplyIn",
            Op::Standardize => "standardize",
            Op::WavetableIn => "wavetableIn",
            Op::WaveModIn => "waveModIn",
            Op::Delay => "delay",
            Op::Biquad => "biquad",
            Op::OnePole => "onePole",
            Op::Envelope => "envelope",
            Op::Overdrive => "overdrive",
            Op::Clip => "clip",
            Op::Normalize => "normalize",
            Op::WriteBytes => "writeBytes",
            Op::WriteWavBytes => "writeWavBytes",
            Op::ReadWavBytes => "readWavBytes",
        }
    }

    pub fn from_name(name: &str) -> Option<Op> {
        OPERATIONS.iter().copied().find(|op| op.name() == name)
    }
}

/// The registry table, for handoff to the host.
pub fn operations() -> &'static [Op] {
    &OPERATIONS
}
