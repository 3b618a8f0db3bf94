//! Measurement oracle and page capacity — the engine's two collaborators.
#![allow(dead_code)]
//!
//! The engine never measures anything itself. A browser-backed host answers
//! with a layout pass, the HTTP service answers with
//! `layout::text_oracle::TextMetricsOracle`, and tests answer from a
//! `HeightTable`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::pagination::cursor::{Unit, UnitKey};
use crate::pagination::error::MeasureError;

// ────────────────────────────────────────────────────────────────────────────
// Trait definitions
// ────────────────────────────────────────────────────────────────────────────

/// Sizes a unit. Must be deterministic for a given unit under unchanged style
/// configuration, and must include the unit's own margins and padding.
pub trait MeasurementOracle {
    fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError>;
}

/// Asynchronous flavour for oracles that wait on a render pass before a
/// height is readable. The engine awaits each call before issuing the next.
#[async_trait]
pub trait AsyncMeasurementOracle: Send {
    async fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError>;
}

/// Reports the usable height of a page (page height minus fixed margins).
pub trait PageCapacity {
    fn usable_height(&self) -> f32;
}

impl PageCapacity for f32 {
    fn usable_height(&self) -> f32 {
        *self
    }
}

impl<F> MeasurementOracle for F
where
    F: FnMut(&Unit<'_>) -> Result<f32, MeasureError>,
{
    fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError> {
        self(unit)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-pass cache
// ────────────────────────────────────────────────────────────────────────────

/// Memoizes heights by `UnitKey` for the duration of one pagination pass, so
/// a unit rolled back at the bottom of one page and placed first on the next
/// is only measured once.
///
/// Keys are only meaningful for a single document; never share a cache
/// between passes.
pub struct CachedOracle<'o, O: ?Sized> {
    inner: &'o mut O,
    heights: HashMap<UnitKey, f32>,
    calls: usize,
}

impl<'o, O: ?Sized> CachedOracle<'o, O> {
    pub fn new(inner: &'o mut O) -> Self {
        CachedOracle {
            inner,
            heights: HashMap::new(),
            calls: 0,
        }
    }

    /// Number of times the wrapped oracle was actually invoked.
    pub fn inner_calls(&self) -> usize {
        self.calls
    }
}

impl<O: MeasurementOracle + ?Sized> MeasurementOracle for CachedOracle<'_, O> {
    fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError> {
        let key = unit.key();
        if let Some(&height) = self.heights.get(&key) {
            return Ok(height);
        }
        self.calls += 1;
        let height = self.inner.measure(unit)?;
        self.heights.insert(key, height);
        Ok(height)
    }
}

#[async_trait]
impl<O: AsyncMeasurementOracle + ?Sized> AsyncMeasurementOracle for CachedOracle<'_, O> {
    async fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError> {
        let key = unit.key();
        if let Some(&height) = self.heights.get(&key) {
            return Ok(height);
        }
        self.calls += 1;
        let height = self.inner.measure(unit).await?;
        self.heights.insert(key, height);
        Ok(height)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HeightTable — deterministic lookup oracle for tests
// ────────────────────────────────────────────────────────────────────────────

/// Fixed heights per unit. Unknown units are a measurement failure.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct HeightTable {
    heights: HashMap<UnitKey, f32>,
}

#[cfg(test)]
impl HeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, section: usize, height: f32) -> Self {
        self.heights.insert(UnitKey::Title { section }, height);
        self
    }

    pub fn row(mut self, section: usize, row: usize, height: f32) -> Self {
        self.heights.insert(UnitKey::Row { section, row }, height);
        self
    }

    /// Registers `heights` as rows `0..` of `section`.
    pub fn rows(mut self, section: usize, heights: &[f32]) -> Self {
        for (row, &height) in heights.iter().enumerate() {
            self.heights.insert(UnitKey::Row { section, row }, height);
        }
        self
    }

    pub fn get(&self, key: UnitKey) -> Option<f32> {
        self.heights.get(&key).copied()
    }
}

#[cfg(test)]
impl MeasurementOracle for HeightTable {
    fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError> {
        let key = unit.key();
        self.get(key)
            .ok_or_else(|| MeasureError(format!("no height registered for {key}")))
    }
}

#[cfg(test)]
#[async_trait]
impl AsyncMeasurementOracle for HeightTable {
    async fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError> {
        MeasurementOracle::measure(self, unit)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
