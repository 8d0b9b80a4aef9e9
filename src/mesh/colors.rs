//! Per-face color mapping for flat-shaded rendering

use std::collections::HashMap;

use crate::tectonics::Craton;

/// RGBA color type
pub type FaceColor = [f32; 4];

/// Trait for mapping a face index to a color
pub trait FaceColorMapper {
    /// Map a face index to an RGBA color
    fn map_color(&self, face: usize) -> FaceColor;
}

/// Paints every face the same color
#[derive(Debug, Clone, Copy)]
pub struct UniformFaceColor(pub FaceColor);

impl Default for UniformFaceColor {
    fn default() -> Self {
        Self([0.55, 0.6, 0.65, 1.0]) // Slate gray
    }
}

impl FaceColorMapper for UniformFaceColor {
    fn map_color(&self, _face: usize) -> FaceColor {
        self.0
    }
}

/// Highlights craton center faces on top of a base color
#[derive(Debug, Clone)]
pub struct CratonHighlighter {
    base: FaceColor,
    highlights: HashMap<usize, FaceColor>,
}

impl CratonHighlighter {
    /// Reddish-orange used for craton centers
    pub const DEFAULT_HIGHLIGHT: FaceColor = [1.0, 0.2, 0.1, 1.0];

    /// Highlight the given cratons with the default colors
    pub fn new(cratons: &[Craton]) -> Self {
        Self::with_colors(cratons, UniformFaceColor::default().0, Self::DEFAULT_HIGHLIGHT)
    }

    /// Highlight the given cratons with custom colors
    pub fn with_colors(cratons: &[Craton], base: FaceColor, highlight: FaceColor) -> Self {
        let highlights = cratons
            .iter()
            .map(|craton| (craton.center_index, highlight))
            .collect();
        Self { base, highlights }
    }

    /// Face index -> highlight color for every craton center
    pub fn highlights(&self) -> &HashMap<usize, FaceColor> {
        &self.highlights
    }
}

impl FaceColorMapper for CratonHighlighter {
    fn map_color(&self, face: usize) -> FaceColor {
        self.highlights.get(&face).copied().unwrap_or(self.base)
    }
}
