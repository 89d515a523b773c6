//! Error types for the SRNG engine
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Out-of-range selectors and setup/lifecycle misuse
//! - [`DmaError`]: Coherent memory and descriptor layout failures
//!
//! The unified [`Error`] enum wraps both domain errors and is returned
//! by the device-level operations.
//!
//! A full or empty ring is not an error: ring operations return `None`
//! and callers poll again later.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and setup errors
///
/// These are programmer errors: the caller passed an out-of-range selector or
/// called an operation out of order. They are never retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Ring type selector outside the known ring types
    InvalidType,
    /// Ring instance number not below the type's instance count
    InvalidRingNumber,
    /// Resolved ring id outside the global ring id space
    InvalidRingId,
    /// Malformed argument (empty list, undersized buffer, bad entry count)
    InvalidArgument,
    /// Pointer store or ring already set up
    AlreadyInitialized,
    /// Pointer store or ring not set up yet
    NotInitialized,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidType => "invalid ring type",
            ConfigError::InvalidRingNumber => "invalid ring number",
            ConfigError::InvalidRingId => "invalid ring id",
            ConfigError::InvalidArgument => "invalid argument",
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::NotInitialized => "not initialized",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Coherent memory and descriptor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Coherent allocation failed
    OutOfMemory,
    /// Descriptor slice shorter than the layout being encoded or decoded
    InvalidLength,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::OutOfMemory => "out of coherent memory",
            DmaError::InvalidLength => "invalid descriptor length",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match hal.setup(RingType::CeSrc, 12, 0, params) {
///     Err(Error::Config(ConfigError::InvalidRingNumber)) => { /* ... */ }
///     Err(Error::Dma(DmaError::OutOfMemory)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

/// Result type alias for device-level operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

// =============================================================================
// Unit Tests
// =============================================================================
