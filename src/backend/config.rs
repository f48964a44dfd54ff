//! Configuration for decompositions.

/// Default number of power iterations of a randomized decomposition.
pub const DEFAULT_NITER: usize = 1;
/// Default oversampling of a randomized decomposition.
pub const DEFAULT_OVERSAMP: usize = 5;

/// Numeric routine used to factor the decomposed tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvdMethod {
    /// Reduced (thin) singular value decomposition.
    Reduced,
    /// Randomized singular value decomposition; needs a target rank.
    Randomized { niter: usize, oversamp: usize },
}

/// Configuration options for `einsvd` and `einsumsvd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompositionConfig {
    /// Truncation rank; `None` keeps every singular value.
    pub rank: Option<usize>,
    /// Factorization routine.
    pub method: SvdMethod,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            rank: None,
            method: SvdMethod::Reduced,
        }
    }
}

impl DecompositionConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduced decomposition keeping every singular value.
    pub fn reduced() -> Self {
        Self::default()
    }

    /// Randomized decomposition truncated to `rank`.
    pub fn randomized(rank: usize) -> Self {
        Self {
            rank: Some(rank),
            method: SvdMethod::Randomized {
                niter: DEFAULT_NITER,
                oversamp: DEFAULT_OVERSAMP,
            },
        }
    }

    /// Sets the truncation rank.
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Sets the power iterations, switching to the randomized routine.
    pub fn with_niter(mut self, niter: usize) -> Self {
        let oversamp = match self.method {
            SvdMethod::Randomized { oversamp, .. } => oversamp,
            SvdMethod::Reduced => DEFAULT_OVERSAMP,
        };
        self.method = SvdMethod::Randomized { niter, oversamp };
        self
    }

    /// Sets the oversampling, switching to the randomized routine.
    pub fn with_oversamp(mut self, oversamp: usize) -> Self {
        let niter = match self.method {
            SvdMethod::Randomized { niter, .. } => niter,
            SvdMethod::Reduced => DEFAULT_NITER,
        };
        self.method = SvdMethod::Randomized { niter, oversamp };
        self
    }
}
