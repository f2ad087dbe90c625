//! Text operators for PDF content streams

/// Font state for one text show operation
pub(crate) struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
}

/// Generate the operators that show `text_hex` in black with its origin at (x, y)
///
/// Coordinates are PDF user space (origin bottom-left). Alignment has
/// already been applied by the caller.
pub(crate) fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    format!(
        "BT\n0 g\n/{} {} Tf\n{x} {y} Td\n{text_hex} Tj\nET\n",
        ctx.font_name, ctx.font_size
    )
    .into_bytes()
}
