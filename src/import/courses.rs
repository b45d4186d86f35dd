use super::context::ImportContext;
use crate::error::Result;
use crate::model::name::optional_name_key;
use crate::model::{CourseId, HoleId};
use crate::sheet::{CourseRow, HoleRow, Workbook};
use rusqlite::types::Value;

/// Field difficulty sheet
pub fn import_courses(ctx: &mut ImportContext, workbook: &Workbook) -> Result<()> {
    let config = ctx.config;
    let rows = workbook.rows(&config.sheets.courses);
    log::info!("Importing {} course rows", rows.len());

    for row in rows {
        let course = CourseRow::from_row(row, &config.columns.courses);
        if resolve_or_create_course(ctx, &course)?.is_some() {
            ctx.report.counts.courses += 1;
        }
    }

    Ok(())
}

/// Same resolution order as players: legacy ID, name, insert
pub fn resolve_or_create_course(ctx: &mut ImportContext, course: &CourseRow) -> Result<Option<CourseId>> {
    if !course.has_identity() {
        return Ok(None);
    }
    let key = optional_name_key(&course.name);

    if let Some(legacy) = &course.legacy_id {
        let found = ctx.query_id(
            "SELECT id FROM courses WHERE legacy_id = ?1 LIMIT 1",
            &[Value::from(legacy.clone())],
        )?;
        if let Some(id) = found {
            return Ok(Some(CourseId(id)));
        }
    }

    if let Some(key) = &key {
        let found = ctx.query_id(
            "SELECT id FROM courses WHERE name_key = ?1 LIMIT 1",
            &[Value::from(key.clone())],
        )?;
        if let Some(id) = found {
            return Ok(Some(CourseId(id)));
        }
    }

    let inserted = ctx.query_id(
        "INSERT INTO courses (legacy_id, name, name_key, city, rating, slope)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT DO NOTHING
         RETURNING id",
        &[
            Value::from(course.legacy_id.clone()),
            Value::from(course.name.clone()),
            Value::from(key.clone()),
            Value::from(course.city.clone()),
            Value::from(course.rating),
            Value::from(course.slope),
        ],
    )?;
    if let Some(id) = inserted {
        log::debug!("Created course '{}' ({})", course.name, id);
        return Ok(Some(CourseId(id)));
    }

    let existing = ctx.query_id(
        "SELECT id FROM courses WHERE name_key = ?1 OR legacy_id = ?2 LIMIT 1",
        &[Value::from(key), Value::from(course.legacy_id.clone())],
    )?;
    Ok(existing.map(CourseId))
}

/// Field holes sheet; needs the course dictionary
pub fn import_holes(ctx: &mut ImportContext, workbook: &Workbook) -> Result<()> {
    let config = ctx.config;
    let rows = workbook.rows(&config.sheets.holes);
    log::info!("Importing {} hole rows", rows.len());

    for row in rows {
        let hole = HoleRow::from_row(row, &config.columns.holes);
        let course = match ctx.lookups.course(&hole.course_legacy_id) {
            Some(id) => id,
            None => {
                ctx.report.missed_course(&hole.course_legacy_id);
                continue;
            }
        };
        if upsert_hole(ctx, course, &hole)?.is_some() {
            ctx.report.counts.holes += 1;
        }
    }

    Ok(())
}

/// Insert or update a hole. Par and stroke index always take the new
/// values; the photo only when the new one is non-empty.
pub fn upsert_hole(ctx: &mut ImportContext, course: CourseId, hole: &HoleRow) -> Result<Option<HoleId>> {
    let number = match hole.hole_number {
        Some(n) if n > 0 => n,
        _ => {
            log::debug!("Skipping hole row without a hole number (course {})", course);
            return Ok(None);
        }
    };

    let id = ctx.query_id(
        "INSERT INTO holes (course_id, hole_number, par, stroke_index, photo_url)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (course_id, hole_number) DO UPDATE SET
            par = excluded.par,
            stroke_index = excluded.stroke_index,
            photo_url = COALESCE(excluded.photo_url, holes.photo_url)
         RETURNING id",
        &[
            Value::from(course),
            Value::from(number),
            Value::from(hole.par),
            Value::from(hole.stroke_index),
            Value::from(hole.photo.clone()),
        ],
    )?;
    Ok(id.map(HoleId))
}
