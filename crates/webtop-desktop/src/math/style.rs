/// Window frame metrics used by hit testing
pub struct FrameStyle {
    pub title_bar_height: f32,
    pub border_width: f32,
    pub resize_handle_size: f32,
    pub button_size: f32,
    pub button_spacing: f32,
    pub button_margin: f32,
}

/// Default frame style
pub const FRAME_STYLE: FrameStyle = FrameStyle {
    title_bar_height: 28.0,
    border_width: 1.0,
    resize_handle_size: 8.0,
    button_size: 16.0,
    button_spacing: 6.0,
    button_margin: 8.0,
};
