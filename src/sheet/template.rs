use crate::config::ImportConfig;
use crate::error::Result;
use rust_xlsxwriter::{Format, FormatBorder, Workbook};
use std::path::Path;

/// Sheet names with their mapped headers, in import order
pub fn template_layout(config: &ImportConfig) -> Vec<(String, Vec<String>)> {
    let s = &config.sheets;
    let c = &config.columns;

    vec![
        (
            s.players.clone(),
            vec![
                c.players.id.clone(),
                c.players.name.clone(),
                c.players.first_name.clone(),
                c.players.last_name.clone(),
                c.players.hcp.clone(),
                c.players.size.clone(),
                c.players.phone.clone(),
                c.players.photo.clone(),
                c.players.team.clone(),
            ],
        ),
        (
            s.courses.clone(),
            vec![
                c.courses.id.clone(),
                c.courses.name.clone(),
                c.courses.city.clone(),
                c.courses.rating.clone(),
                c.courses.slope.clone(),
            ],
        ),
        (
            s.holes.clone(),
            vec![
                c.holes.course_id.clone(),
                c.holes.hole.clone(),
                c.holes.par.clone(),
                c.holes.stroke_index.clone(),
                c.holes.photo.clone(),
            ],
        ),
        (
            s.schedule.clone(),
            vec![
                c.schedule.day.clone(),
                c.schedule.course_id.clone(),
                c.schedule.game_mode.clone(),
                c.schedule.scoring_mode.clone(),
                c.schedule.hcp_policy.clone(),
            ],
        ),
        (
            s.games.clone(),
            vec![
                c.games.id.clone(),
                c.games.course_id.clone(),
                c.games.stage.clone(),
                c.games.red_names.clone(),
                c.games.blue_names.clone(),
                c.games.status.clone(),
            ],
        ),
        (
            s.results.clone(),
            vec![
                c.results.game_id.clone(),
                c.results.hole.clone(),
                c.results.red_score.clone(),
                c.results.blue_score.clone(),
            ],
        ),
        (
            s.leaderboard.clone(),
            vec![c.leaderboard.team.clone(), c.leaderboard.points.clone()],
        ),
    ]
}

/// Write an empty import workbook: one sheet per configured name, header row only
pub fn write_template(path: &Path, config: &ImportConfig) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new().set_bold().set_border_bottom(FormatBorder::Thin);

    for (name, headers) in template_layout(config) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;

        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            sheet.set_column_width(col, (header.chars().count() + 4).max(12) as f64)?;
            sheet.write_string_with_format(0, col, header, &header_format)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
