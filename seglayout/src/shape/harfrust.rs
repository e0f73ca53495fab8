// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Shaper`] backed by `harfrust`.

use std::cell::RefCell;
use std::sync::Arc;

use hashbrown::HashMap;
use skrifa::raw::TableProvider;

use crate::geom::Point;
use crate::shape::{GlyphSlot, ShapeRequest, ShapedText, Shaper};
use crate::source::WritingSystem;
use crate::util::char_indices;
use crate::Error;

struct Face {
    data: Arc<[u8]>,
    index: u32,
    shaper_data: harfrust::ShaperData,
    units_per_em: u16,
}

/// Shapes text with `harfrust`, using one font per writing system.
pub struct HarfrustShaper {
    faces: HashMap<WritingSystem, Face>,
    buffer: RefCell<Option<harfrust::UnicodeBuffer>>,
}

impl core::fmt::Debug for HarfrustShaper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HarfrustShaper")
            .field("writing_systems", &self.faces.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for HarfrustShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl HarfrustShaper {
    /// Creates a shaper without fonts.
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            buffer: RefCell::new(Some(harfrust::UnicodeBuffer::new())),
        }
    }

    /// Uses face `index` of the font file `data` for `ws`.
    pub fn add_font(
        &mut self,
        ws: WritingSystem,
        data: impl Into<Arc<[u8]>>,
        index: u32,
    ) -> Result<(), Error> {
        let data = data.into();
        let font = harfrust::FontRef::from_index(&data, index)
            .map_err(|err| Error::font(format!("cannot read face {index}: {err}")))?;
        let shaper_data = harfrust::ShaperData::new(&font);
        let units_per_em = skrifa::FontRef::from_index(&data, index)
            .ok()
            .and_then(|font| font.head().ok())
            .map(|head| head.units_per_em())
            .filter(|&units| units != 0)
            .ok_or_else(|| Error::font(format!("face {index} has no usable head table")))?;
        self.faces.insert(
            ws,
            Face {
                data,
                index,
                shaper_data,
                units_per_em,
            },
        );
        Ok(())
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "glyph positions are far inside the i32 range"
)]
fn scaled(value: i32, scale: f32) -> i32 {
    (value as f32 * scale).round() as i32
}

impl Shaper for HarfrustShaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> Result<ShapedText, Error> {
        let ws = request.font.ws;
        let face = self
            .faces
            .get(&ws)
            .ok_or_else(|| Error::font(format!("no face for writing system {}", ws.0)))?;
        let font = harfrust::FontRef::from_index(&face.data, face.index)
            .map_err(|err| Error::shaping(format!("{err}")))?;
        let shaper = face
            .shaper_data
            .shaper(&font)
            .point_size(Some(request.font.size))
            .build();

        let mut buffer = self
            .buffer
            .borrow_mut()
            .take()
            .unwrap_or_else(harfrust::UnicodeBuffer::new);
        buffer.clear();
        for (offset, ch) in char_indices(request.text) {
            let cluster = u32::try_from(offset)
                .map_err(|_| Error::shaping("text too long for the shaping buffer"))?;
            buffer.add(ch, cluster);
        }
        buffer.set_direction(if request.rtl {
            harfrust::Direction::RightToLeft
        } else {
            harfrust::Direction::LeftToRight
        });
        buffer.guess_segment_properties();
        let glyphs = shaper.shape(buffer, &[]);

        let mut starts: Vec<usize> = glyphs
            .glyph_infos()
            .iter()
            .map(|info| info.cluster as usize)
            .collect();
        starts.sort_unstable();
        starts.dedup();
        let scale = request.font.size * request.dpi as f32 / 72.0 / f32::from(face.units_per_em);
        let slots = glyphs
            .glyph_infos()
            .iter()
            .zip(glyphs.glyph_positions())
            .map(|(info, position)| {
                let start = info.cluster as usize;
                let end = starts
                    .get(starts.partition_point(|&other| other <= start))
                    .copied()
                    .unwrap_or(request.text.len());
                GlyphSlot {
                    glyph_id: info.glyph_id,
                    advance: scaled(position.x_advance, scale),
                    offset: Point::new(
                        scaled(position.x_offset, scale),
                        scaled(position.y_offset, scale),
                    ),
                    chars: start..end,
                    break_before: None,
                }
            })
            .collect();
        *self.buffer.borrow_mut() = Some(glyphs.clear());
        Ok(ShapedText { slots })
    }
}
