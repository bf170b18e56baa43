//! Wizard step sequence

/// Position in the wizard. Indices are stable and shared with the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum WizardStep {
    #[default]
    Welcome = 0,
    SelectImage = 1,
    Masking = 2,
    Processing = 3,
    FinalResult = 4,
    Completed = 5,
}

impl WizardStep {
    pub const FIRST: Self = Self::Welcome;
    pub const LAST: Self = Self::Completed;

    const ALL: [Self; 6] = [
        Self::Welcome,
        Self::SelectImage,
        Self::Masking,
        Self::Processing,
        Self::FinalResult,
        Self::Completed,
    ];

    /// Map any integer onto a step, clamping to the valid range
    pub fn clamped(index: i64) -> Self {
        let last = Self::LAST.index() as i64;
        Self::ALL[index.clamp(0, last) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Self {
        Self::clamped(self.index() as i64 + 1)
    }

    pub fn prev(self) -> Self {
        Self::clamped(self.index() as i64 - 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::SelectImage => "Select image",
            Self::Masking => "Masking the image",
            Self::Processing => "Processing image",
            Self::FinalResult => "Final result",
            Self::Completed => "Completed",
        }
    }
}
