use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{Flash, FlashKind};
use crate::theme::Theme;

/// Builder for rendering a consistent status bar across views.
///
/// The status bar has a standard layout:
/// `[Label] [Loading?] Position | Flash or Help Text`
pub struct StatusBar<'a> {
    theme: &'a Theme,
    label: &'a str,
    loading_text: Option<&'a str>,
    position: Option<(usize, usize)>,
    flash: Option<&'a Flash>,
    help_text: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            label: "",
            loading_text: None,
            position: None,
            flash: None,
            help_text: "",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: &'a str) -> Self {
        self.loading_text = Some(text);
        self
    }

    pub fn position(mut self, current: usize, total: usize) -> Self {
        self.position = Some((current, total));
        self
    }

    /// A transient message shown instead of the help text.
    pub fn flash(mut self, flash: Option<&'a Flash>) -> Self {
        self.flash = flash;
        self
    }

    pub fn help(mut self, text: &'a str) -> Self {
        self.help_text = text;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), self.theme.status_bar_style()),
            Span::raw(" "),
        ];

        if let Some(loading) = self.loading_text {
            spans.push(Span::styled(loading.to_string(), self.theme.spinner_style()));
            spans.push(Span::raw(" | "));
        }

        if let Some((current, total)) = self.position {
            spans.push(Span::styled(
                format!("{}/{}", current, total),
                self.theme.dim_style(),
            ));
            spans.push(Span::raw(" | "));
        }

        match self.flash {
            Some(flash) => {
                let color = match flash.kind {
                    FlashKind::Info => self.theme.success,
                    FlashKind::Error => self.theme.error,
                };
                spans.push(Span::styled(
                    flash.message.clone(),
                    Style::default().fg(color),
                ));
            }
            None => spans.push(Span::styled(
                self.help_text.to_string(),
                self.theme.dim_style(),
            )),
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
