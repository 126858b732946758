use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::foundation::error::ReelResult;
use crate::layout::blocks::{PlacedLine, SlideLayout, TextRole, layout_blocks, visible_blocks};
use crate::layout::plate::plate_path;
use crate::layout::resolved::ResolvedStyle;
use crate::layout::shadow::{SHADOW_COPIES, glow_copies, shadow_copies, stroke_copies};
use crate::model::project::overlay_alpha;
use crate::model::slide::Slide;
use crate::render::background::{cover_transform, diagonal_gradient};
use crate::render::filters::{
    blur_rounded_region, brightness_contrast_matrix, color_matrix_rgba8_premul_in_place,
    premul_over_in_place, premul_over_shifted,
};
use crate::render::fonts::FontBook;
use crate::render::surface::{
    RasterImage, Surface, affine_to_cpu, bezpath_to_cpu, rect_to_cpu,
};
use crate::render::transitions::transition_effect;

/// Inputs for one composed frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameRequest<'a> {
    pub slide: &'a Slide,
    /// Current background frame; `None` draws the fallback gradient.
    pub background: Option<&'a RasterImage>,
    /// Entry transition progress, `0..=1`.
    pub transition_progress: f64,
    /// Project overlay darkness in percent; the slide override wins.
    pub overlay_opacity: Option<f32>,
    /// Seconds into the slide for block visibility; `None` shows every block.
    pub clock: Option<f64>,
}

impl<'a> FrameRequest<'a> {
    /// Fully settled frame with every block visible.
    pub fn still(slide: &'a Slide, background: Option<&'a RasterImage>) -> Self {
        Self {
            slide,
            background,
            transition_progress: 1.0,
            overlay_opacity: None,
            clock: None,
        }
    }
}

/// Draws complete slide frames onto a [`Surface`].
///
/// Stages: background and overlay, backdrop blur under plates, text layer, then the
/// transition while compositing onto the cleared output.
pub struct Compositor {
    fonts: FontBook,
    gradient: Option<RasterImage>,
}

impl Compositor {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            gradient: None,
        }
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Text layout for a request, as drawn by [`Compositor::render`].
    pub fn layout(&mut self, req: &FrameRequest<'_>, canvas: Canvas) -> SlideLayout {
        let style = ResolvedStyle::resolve(&req.slide.style);
        let blocks = visible_blocks(req.slide, req.clock);
        layout_blocks(&mut self.fonts, &blocks, &style, canvas)
    }

    /// Compose one frame. Identical requests produce identical output.
    pub fn render(&mut self, surface: &mut Surface, req: &FrameRequest<'_>) -> ReelResult<()> {
        surface.clear();
        let canvas = surface.canvas();
        let style = ResolvedStyle::resolve(&req.slide.style);
        let blocks = visible_blocks(req.slide, req.clock);
        let layout = layout_blocks(&mut self.fonts, &blocks, &style, canvas);

        self.draw_scene(surface, req)?;

        if let Some(plate) = style.plate
            && plate.blur > 0.0
        {
            let scene = surface.scene.data_as_u8_slice_mut();
            for rect in layout.groups.iter().filter_map(|g| g.plate) {
                blur_rounded_region(
                    scene,
                    canvas.width,
                    canvas.height,
                    rect,
                    plate.radius,
                    plate.blur,
                )?;
            }
        }

        self.draw_text_layer(surface, &layout, &style);
        premul_over_in_place(
            surface.scene.data_as_u8_slice_mut(),
            surface.text.data_as_u8_slice(),
        )?;

        let fx = transition_effect(
            req.slide.transition_kind(),
            req.transition_progress,
            f64::from(canvas.width),
        );
        if fx.has_color_filter() {
            color_matrix_rgba8_premul_in_place(
                surface.scene.data_as_u8_slice_mut(),
                brightness_contrast_matrix(fx.brightness, fx.contrast),
            );
        }
        premul_over_shifted(
            &mut surface.output,
            surface.scene.data_as_u8_slice(),
            canvas.width,
            canvas.height,
            fx.offset_x.round() as i64,
            fx.opacity,
        )
    }

    fn draw_scene(&mut self, surface: &mut Surface, req: &FrameRequest<'_>) -> ReelResult<()> {
        let canvas = surface.canvas();
        let bg = match req.background {
            Some(img) => img.clone(),
            None => self.gradient(canvas)?,
        };

        let ctx = &mut surface.ctx;
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(cover_transform(bg.width, bg.height, canvas)));
        ctx.set_paint(bg.paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(bg.width),
            f64::from(bg.height),
        ));

        let alpha = overlay_alpha(req.slide, req.overlay_opacity);
        if alpha > 0.0 {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(Color::BLACK.with_opacity(alpha).to_paint());
            ctx.fill_rect(&rect_to_cpu(canvas.rect()));
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.scene);
        Ok(())
    }

    fn gradient(&mut self, canvas: Canvas) -> ReelResult<RasterImage> {
        if let Some(g) = &self.gradient
            && g.width == canvas.width
            && g.height == canvas.height
        {
            return Ok(g.clone());
        }
        let g = diagonal_gradient(canvas)?;
        self.gradient = Some(g.clone());
        Ok(g)
    }

    fn draw_text_layer(&mut self, surface: &mut Surface, layout: &SlideLayout, style: &ResolvedStyle) {
        let ctx = &mut surface.ctx;
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        for group in &layout.groups {
            if let (Some(rect), Some(plate)) = (group.plate, style.plate) {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(plate.fill.to_paint());
                ctx.fill_path(&bezpath_to_cpu(&plate_path(rect, plate.radius)));
            }
            for line in group.blocks.iter().flat_map(|b| &b.lines) {
                self.draw_line(ctx, line, style);
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.text);
    }

    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        line: &PlacedLine,
        style: &ResolvedStyle,
    ) {
        let (font, default_color) = match line.role {
            TextRole::Title => (&style.title_font, style.title_color),
            TextRole::Body => (&style.body_font, style.body_color),
        };

        let mut passes: Vec<(Vec2, Color)> = Vec::new();
        if let Some(shadow) = style.shadow {
            passes.extend(
                shadow_copies(shadow.intensity, shadow.radius, SHADOW_COPIES)
                    .into_iter()
                    .map(|c| (c.offset, Color::BLACK.with_opacity(c.opacity))),
            );
        }
        if let Some(glow) = style.glow {
            passes.extend(
                glow_copies(glow.size)
                    .into_iter()
                    .map(|c| (c.offset, glow.color.with_opacity(c.opacity))),
            );
        }
        if let Some(stroke) = style.stroke {
            passes.extend(
                stroke_copies(stroke.width)
                    .into_iter()
                    .map(|c| (c.offset, stroke.color.with_opacity(c.opacity))),
            );
        }

        for seg in &line.segments {
            // Transform applies to drawn glyphs only; offsets were measured untransformed.
            let text = style.transform.apply(&seg.text, seg.word_start);
            if text.trim().is_empty() {
                continue;
            }
            let Some((font_data, shaped)) = self.fonts.shape(font, &text, style.letter_spacing)
            else {
                continue;
            };
            let origin = line.origin.to_vec2() + Vec2::new(seg.x, 0.0);
            let fill = seg.color.unwrap_or(default_color);
            for (offset, color) in passes.iter().copied().chain([(Vec2::ZERO, fill)]) {
                ctx.set_transform(affine_to_cpu(Affine::translate(origin + offset)));
                ctx.set_paint(color.to_paint());
                ctx.glyph_run(&font_data)
                    .font_size(font.size)
                    .fill_glyphs(shaped.glyphs.iter().copied());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
