//! Customer segments and size-weighted price elasticity

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::error::{finite, non_negative, ValidationError};
use crate::core::identity::{SegmentId, SegmentIdGenerator};

/// Elasticity assumed when there is nothing to weight
pub const DEFAULT_ELASTICITY: f64 = -0.5;

/// A group of customers sharing a price sensitivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegment {
    pub id: SegmentId,
    pub name: String,
    pub size: f64,
    /// Negative; steeper means more elastic
    pub price_elasticity: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Partial update applied by [`CustomerSegmentAggregator::update_segment`]
#[derive(Debug, Clone, Default)]
pub struct SegmentUpdate {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub price_elasticity: Option<f64>,
    pub description: Option<String>,
}

/// Owns the customer segments of a pricing model
#[derive(Debug, Clone, Default)]
pub struct CustomerSegmentAggregator {
    segments: Vec<CustomerSegment>,
    ids: SegmentIdGenerator,
}

impl CustomerSegmentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore segments (e.g. from a snapshot), keeping their ids
    ///
    /// Ids must be unique across the restored set.
    pub fn from_segments(segments: Vec<CustomerSegment>) -> Result<Self, ValidationError> {
        let mut seen = BTreeSet::new();
        for segment in &segments {
            non_negative("segment size", segment.size)?;
            finite("price elasticity", segment.price_elasticity)?;
            if !seen.insert(segment.id) {
                return Err(ValidationError::DuplicateSegment(segment.id.to_string()));
            }
        }
        let ids = SegmentIdGenerator::resume_after(segments.iter().map(|s| &s.id));
        Ok(Self { segments, ids })
    }

    pub fn add_segment(
        &mut self,
        name: impl Into<String>,
        size: f64,
        price_elasticity: f64,
        description: impl Into<String>,
    ) -> Result<SegmentId, ValidationError> {
        let size = non_negative("segment size", size)?;
        let price_elasticity = finite("price elasticity", price_elasticity)?;
        let id = self.ids.next_id()?;

        self.segments.push(CustomerSegment {
            id,
            name: name.into(),
            size,
            price_elasticity,
            description: description.into(),
        });
        Ok(id)
    }

    /// Merge the present fields of `update` into the segment
    ///
    /// Returns `Ok(false)` when no segment has this id.
    pub fn update_segment(
        &mut self,
        id: &SegmentId,
        update: SegmentUpdate,
    ) -> Result<bool, ValidationError> {
        if let Some(size) = update.size {
            non_negative("segment size", size)?;
        }
        if let Some(elasticity) = update.price_elasticity {
            finite("price elasticity", elasticity)?;
        }

        let Some(segment) = self.segments.iter_mut().find(|s| s.id == *id) else {
            return Ok(false);
        };

        if let Some(name) = update.name {
            segment.name = name;
        }
        if let Some(size) = update.size {
            segment.size = size;
        }
        if let Some(elasticity) = update.price_elasticity {
            segment.price_elasticity = elasticity;
        }
        if let Some(description) = update.description {
            segment.description = description;
        }
        Ok(true)
    }

    /// Returns `false` when no segment has this id
    pub fn remove_segment(&mut self, id: &SegmentId) -> bool {
        let before = self.segments.len();
        self.segments.retain(|s| s.id != *id);
        self.segments.len() != before
    }

    pub fn get(&self, id: &SegmentId) -> Option<&CustomerSegment> {
        self.segments.iter().find(|s| s.id == *id)
    }

    pub fn segments(&self) -> &[CustomerSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Σ(elasticity × size) / Σ size, or [`DEFAULT_ELASTICITY`] when the
    /// total size is zero
    pub fn weighted_elasticity(&self) -> f64 {
        let total_size: f64 = self.segments.iter().map(|s| s.size).sum();
        if total_size == 0.0 {
            return DEFAULT_ELASTICITY;
        }
        let weighted: f64 = self
            .segments
            .iter()
            .map(|s| s.price_elasticity * s.size)
            .sum();
        weighted / total_size
    }
}
