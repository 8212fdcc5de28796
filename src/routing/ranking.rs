use crate::config::RouterConfig;
use crate::geometry::Bounds;

use super::direction::{DirectionGroup, DIRECTION_TABLE};
use super::element::ConnectionElement;
use super::estimate::estimate_bends;

/// A direction group with its estimated total bend count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub group: DirectionGroup,
    pub cost: u32,
}

/// Connection elements of one direction group for a given set of boxes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attachments {
    pub(crate) source: ConnectionElement,
    pub(crate) label: Option<(ConnectionElement, ConnectionElement)>,
    pub(crate) target: ConnectionElement,
}

impl Attachments {
    pub(crate) fn new(
        group: DirectionGroup,
        source: &Bounds,
        label: Option<&Bounds>,
        target: &Bounds,
        corner_offset: f32,
    ) -> Self {
        Self {
            source: ConnectionElement::new(*source, group.start, corner_offset),
            label: label.map(|label| {
                (
                    ConnectionElement::new(*label, group.mid_enter, corner_offset),
                    ConnectionElement::new(*label, group.mid_exit, corner_offset),
                )
            }),
            target: ConnectionElement::new(*target, group.end, corner_offset),
        }
    }
}

/// Scores all 64 groups and sorts them by cost; equal costs keep table order.
pub fn rank_candidates(
    source: &Bounds,
    label: Option<&Bounds>,
    target: &Bounds,
    config: &RouterConfig,
) -> Vec<Candidate> {
    let threshold = config.edge_distance_threshold;
    let mut ranked: Vec<Candidate> = DIRECTION_TABLE
        .iter()
        .map(|&group| {
            let elements = Attachments::new(group, source, label, target, config.corner_offset);
            let cost = match (label, elements.label) {
                (Some(label_bounds), Some((enter, exit))) => {
                    estimate_bends(&elements.source, &enter, &source.union(label_bounds), threshold)
                        + estimate_bends(&exit, &elements.target, &label_bounds.union(target), threshold)
                }
                _ => estimate_bends(
                    &elements.target,
                    &elements.source,
                    &source.union(target),
                    threshold,
                ),
            };
            Candidate { group, cost }
        })
        .collect();
    // `sort_by_key` is stable.
    ranked.sort_by_key(|candidate| candidate.cost);
    ranked
}
