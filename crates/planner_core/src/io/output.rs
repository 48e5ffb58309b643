use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{Candidate, Environment, Result, SearchOutcome, Tour, plan::tiling::Cell, sector_rays};

/// Writes the plan report to `path`, or stdout when `None`.
pub fn write_report_to(outcome: &SearchOutcome, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_report(outcome, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(outcome, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Plain-text plan: a `key=value` header, then `[cells]`, `[ugv]`, one
/// `[uav i]` section per sector of the canonical cell, the `[rays]`
/// splitting that cell into sectors and a `[cell c uav i]` section for every
/// non-empty sector tour placed on tiling cell `c`. Tours are written closed,
/// one `x,y` per line.
pub fn write_report<W: Write>(outcome: &SearchOutcome, out: &mut W) -> Result<()> {
    let Some(candidate) = outcome.candidate() else {
        writeln!(out, "status=infeasible")?;
        return Ok(());
    };

    write_summary(candidate, out)?;

    writeln!(out, "[cells]")?;
    for cell in &candidate.cells {
        write_cell(cell, out)?;
    }

    writeln!(out, "[ugv]")?;
    write_tour(&candidate.ugv_tour, out)?;

    for (idx, tour) in candidate.uav_tours.iter().enumerate() {
        writeln!(out, "[uav {idx}]")?;
        if let Some(tour) = tour {
            write_tour(tour, out)?;
        }
    }

    let cell = Environment::new(candidate.cell_width, candidate.cell_height)?;
    writeln!(out, "[rays]")?;
    for end in sector_rays(cell.center(), candidate.uav_tours.len(), cell.half_diagonal()) {
        writeln!(out, "{end}")?;
    }

    for (cell_idx, tours) in candidate.cell_tours().iter().enumerate() {
        for (uav_idx, tour) in tours.iter().enumerate() {
            if let Some(tour) = tour {
                writeln!(out, "[cell {cell_idx} uav {uav_idx}]")?;
                write_tour(tour, out)?;
            }
        }
    }
    Ok(())
}

fn write_summary<W: Write>(candidate: &Candidate, out: &mut W) -> Result<()> {
    let mut buf = ryu::Buffer::new();
    writeln!(out, "status=planned")?;
    writeln!(out, "cell_width={}", candidate.cell_width)?;
    writeln!(out, "cell_height={}", candidate.cell_height)?;
    writeln!(out, "cells={}", candidate.cell_count())?;
    writeln!(out, "worst_tour_length={}", buf.format(candidate.worst_tour_length))?;
    writeln!(out, "ugv_time={}", buf.format(candidate.ugv_time))?;
    writeln!(out, "uav_time={}", buf.format(candidate.uav_time))?;
    writeln!(out, "total_time={}", buf.format(candidate.total_time))?;
    Ok(())
}

fn write_cell<W: Write>(cell: &Cell, out: &mut W) -> Result<()> {
    let mut b1 = ryu::Buffer::new();
    let mut b2 = ryu::Buffer::new();
    let mut b3 = ryu::Buffer::new();
    let mut b4 = ryu::Buffer::new();
    let mut b5 = ryu::Buffer::new();
    writeln!(
        out,
        "{},{},{},{},{},{}",
        b1.format(cell.x_min),
        b2.format(cell.y_min),
        b3.format(cell.x_max),
        b4.format(cell.y_max),
        cell.draw_order,
        b5.format(cell.opacity)
    )?;
    Ok(())
}

fn write_tour<W: Write>(tour: &Tour, out: &mut W) -> Result<()> {
    for point in tour.closed() {
        writeln!(out, "{point}")?;
    }
    Ok(())
}
