use jiff::civil::DateTime;
use thiserror::Error;

/// Anything with a start/end wall-clock time can be arranged on the grid.
pub trait TimeSpan {
    fn span_start(&self) -> DateTime;
    fn span_end(&self) -> DateTime;
}

impl<T: TimeSpan + ?Sized> TimeSpan for &T {
    fn span_start(&self) -> DateTime {
        (**self).span_start()
    }

    fn span_end(&self) -> DateTime {
        (**self).span_end()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("interval {index} must end after it starts ({start} to {end})")]
    InvalidInterval {
        index: usize,
        start: DateTime,
        end: DateTime,
    },
}

/// How overlap groups decide whether the next interval still belongs to the
/// current group.
///
/// `LastAppended` compares against the end of the interval appended most
/// recently, which matches the reference renderer but can split a group even
/// though an earlier, longer member still overlaps the candidate.
/// `RunningMax` tracks the maximum end seen so far and merges those cases.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum GroupMerge {
    #[default]
    LastAppended,
    RunningMax,
}

#[derive(Debug, Copy, Clone)]
pub struct ArrangeOptions {
    pub merge: GroupMerge,
    /// Floor applied to the computed card height so short appointments stay
    /// legible.
    pub min_height: f64,
}

impl Default for ArrangeOptions {
    fn default() -> Self {
        Self {
            merge: GroupMerge::default(),
            min_height: 28.0,
        }
    }
}

/// The computed box for one interval: percentage width/left within the day
/// column, pixel top/height on the time grid.
#[derive(Debug, Clone)]
pub struct Arranged<'a, T> {
    pub item: &'a T,
    pub width: f64,
    pub left: f64,
    pub top: i32,
    pub height: i32,
}

pub fn arrange<'a, T, F>(
    items: &'a [T],
    minutes_from_start: F,
    slot_height: f64,
    slot_minutes: f64,
) -> Result<Vec<Arranged<'a, T>>, LayoutError>
where
    T: TimeSpan,
    F: Fn(DateTime) -> f64,
{
    arrange_with(
        items,
        minutes_from_start,
        slot_height,
        slot_minutes,
        ArrangeOptions::default(),
    )
}

pub fn arrange_with<'a, T, F>(
    items: &'a [T],
    minutes_from_start: F,
    slot_height: f64,
    slot_minutes: f64,
    options: ArrangeOptions,
) -> Result<Vec<Arranged<'a, T>>, LayoutError>
where
    T: TimeSpan,
    F: Fn(DateTime) -> f64,
{
    for (index, item) in items.iter().enumerate() {
        if item.span_end() <= item.span_start() {
            return Err(LayoutError::InvalidInterval {
                index,
                start: item.span_start(),
                end: item.span_end(),
            });
        }
    }

    let mut arranged = Vec::with_capacity(items.len());
    for group in overlap_groups(items, options.merge) {
        let columns = pack_columns(&group);
        let width = 100.0 / columns.len() as f64;

        for (col_index, column) in columns.iter().enumerate() {
            for &item in column {
                let top_slots = minutes_from_start(item.span_start()) / slot_minutes;
                let height_slots = duration_minutes(item) / slot_minutes;

                arranged.push(Arranged {
                    item,
                    width,
                    left: col_index as f64 * width,
                    top: (top_slots * slot_height).round().max(0.0) as i32,
                    height: ((height_slots * slot_height).round().max(options.min_height)
                        + slot_height)
                        .round() as i32,
                });
            }
        }
    }

    Ok(arranged)
}

/// Partitions intervals into clusters of transitive overlap. Intervals are
/// sorted ascending by start (stable, so equal starts keep their input
/// order); a new group opens whenever the next interval starts at or after
/// the current group's merge boundary.
pub fn overlap_groups<T: TimeSpan>(items: &[T], merge: GroupMerge) -> Vec<Vec<&T>> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.span_start());

    let mut groups = Vec::new();
    let Some((&first, rest)) = sorted.split_first() else {
        return groups;
    };

    let mut current = vec![first];
    let mut running_end = first.span_end();

    for &item in rest {
        let boundary = match merge {
            GroupMerge::LastAppended => current.last().map(|last| last.span_end()).unwrap(),
            GroupMerge::RunningMax => running_end,
        };
        if item.span_start() < boundary {
            current.push(item);
            running_end = running_end.max(item.span_end());
        } else {
            groups.push(std::mem::replace(&mut current, vec![item]));
            running_end = item.span_end();
        }
    }
    groups.push(current);
    groups
}

/// Greedy first-fit packing of one overlap group into side-by-side columns.
/// Column count ends up equal to the group's maximum concurrent overlap.
fn pack_columns<'a, T: TimeSpan>(group: &[&'a T]) -> Vec<Vec<&'a T>> {
    let mut columns: Vec<Vec<&'a T>> = Vec::new();
    for &item in group {
        let slot = columns
            .iter_mut()
            .find(|column| item.span_start() >= column.last().map(|last| last.span_end()).unwrap());
        match slot {
            Some(column) => column.push(item),
            None => columns.push(vec![item]),
        }
    }
    columns
}

fn duration_minutes<T: TimeSpan>(item: &T) -> f64 {
    item.span_start().duration_until(item.span_end()).as_secs_f64() / 60.0
}
