mod quiz;
mod result;
mod setup;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::session::Phase;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.session.phase {
        Phase::Setup => setup::render(frame, area, app),
        Phase::Active => quiz::render(frame, area, app),
        Phase::Finished => result::render(frame, area, app),
    }
}
