//=========================================================================
// Drop Target
//=========================================================================
//
// Decides what a drop means before anything is mutated.
//
// Rules:
// - exactly one item, with a destination inside the grid
// - item with a source index → move (swap) between the two cells, only
//   if it was lifted from the tile set that is live now
// - item with an external payload → replace the whole puzzle
// - anything else → ignored, with a reason for diagnostics
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::drag::{DragPayload, DropSession};
use crate::core::decode::ExternalPayload;

//=== IgnoredDrop =========================================================

/// Why a drop was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredDrop {
    NoItems,
    TooManyItems(usize),
    NoDestination,
    DestinationOutOfRange { index: usize, count: usize },
    SourceOutOfRange { index: usize, count: usize },

    /// Lifted from a tile set that has since been replaced.
    StaleSession { lifted: u64, current: u64 },

    /// A tile without a source index; nothing to move or decode.
    UnsupportedPayload,

    /// The decode queue refused the payload.
    DecodeUnavailable,

    /// The host view is gone; moves need it.
    ViewUnavailable,
}

//=== DropAction ==========================================================

/// What the controller should do for a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DropAction {
    Move { from: usize, to: usize },
    Replace(ExternalPayload),
    Ignore(IgnoredDrop),
}

//=== DropTarget ==========================================================

/// Drop-target role: validates sessions against the live tile set.
#[derive(Debug, Default, Clone, Copy)]
pub struct DropTarget;

impl DropTarget {
    pub(crate) fn resolve(
        &self,
        session: &DropSession,
        destination: Option<usize>,
        count: usize,
        generation: u64,
    ) -> DropAction {
        let item = match session.items() {
            [] => return DropAction::Ignore(IgnoredDrop::NoItems),
            [item] => item,
            items => return DropAction::Ignore(IgnoredDrop::TooManyItems(items.len())),
        };

        let Some(to) = destination else {
            return DropAction::Ignore(IgnoredDrop::NoDestination);
        };

        if to >= count {
            return DropAction::Ignore(IgnoredDrop::DestinationOutOfRange { index: to, count });
        }

        match (item.source_index, &item.payload) {
            (Some(_), _) if item.generation != generation => {
                DropAction::Ignore(IgnoredDrop::StaleSession {
                    lifted: item.generation,
                    current: generation,
                })
            }
            (Some(from), _) if from >= count => {
                DropAction::Ignore(IgnoredDrop::SourceOutOfRange { index: from, count })
            }
            (Some(from), _) => DropAction::Move { from, to },
            (None, DragPayload::External(payload)) => DropAction::Replace(payload.clone()),
            (None, DragPayload::Tile(_)) => DropAction::Ignore(IgnoredDrop::UnsupportedPayload),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::drag::{DragItem, DragOrigin, DragSource};
    use crate::core::tiles::TileSet;
    use image::DynamicImage;

    fn tiles() -> TileSet {
        TileSet::new(&DynamicImage::new_rgba8(50, 50), 5).unwrap()
    }

    fn lifted(set: &TileSet, index: usize) -> DragItem {
        DragSource.items_for_beginning(set, index, 0).remove(0)
    }

    #[test]
    fn single_local_item_moves() {
        let set = tiles();
        let session = DropSession::local(vec![lifted(&set, 2)]);
        assert_eq!(
            DropTarget.resolve(&session, Some(9), 25, 0),
            DropAction::Move { from: 2, to: 9 }
        );
    }

    #[test]
    fn empty_session_is_ignored() {
        let session = DropSession::local(Vec::new());
        assert_eq!(
            DropTarget.resolve(&session, Some(0), 25, 0),
            DropAction::Ignore(IgnoredDrop::NoItems)
        );
    }

    #[test]
    fn multiple_items_are_ignored() {
        let set = tiles();
        let session = DropSession::local(vec![lifted(&set, 1), lifted(&set, 2)]);
        assert_eq!(
            DropTarget.resolve(&session, Some(0), 25, 0),
            DropAction::Ignore(IgnoredDrop::TooManyItems(2))
        );
    }

    #[test]
    fn missing_destination_is_ignored() {
        let set = tiles();
        let session = DropSession::local(vec![lifted(&set, 1)]);
        assert_eq!(
            DropTarget.resolve(&session, None, 25, 0),
            DropAction::Ignore(IgnoredDrop::NoDestination)
        );
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let set = tiles();
        let session = DropSession::local(vec![lifted(&set, 1)]);
        assert_eq!(
            DropTarget.resolve(&session, Some(25), 25, 0),
            DropAction::Ignore(IgnoredDrop::DestinationOutOfRange { index: 25, count: 25 })
        );

        // Source lifted before a replacement shrank the grid.
        assert_eq!(
            DropTarget.resolve(&session, Some(0), 1, 0),
            DropAction::Ignore(IgnoredDrop::SourceOutOfRange { index: 1, count: 1 })
        );
    }

    #[test]
    fn items_from_a_replaced_set_are_stale() {
        let set = tiles();
        let session = DropSession::local(vec![lifted(&set, 1)]);
        assert_eq!(
            DropTarget.resolve(&session, Some(12), 25, 1),
            DropAction::Ignore(IgnoredDrop::StaleSession { lifted: 0, current: 1 })
        );
    }

    #[test]
    fn multi_file_drop_is_too_many_items() {
        let session = DropSession::external_many(vec![
            ExternalPayload::File("a.png".into()),
            ExternalPayload::File("b.png".into()),
        ]);
        assert_eq!(
            DropTarget.resolve(&session, Some(0), 25, 0),
            DropAction::Ignore(IgnoredDrop::TooManyItems(2))
        );
    }

    #[test]
    fn external_payload_replaces() {
        let payload = ExternalPayload::Bytes(vec![1, 2]);
        let session = DropSession::external(payload.clone());
        assert_eq!(
            DropTarget.resolve(&session, Some(4), 25, 0),
            DropAction::Replace(payload)
        );
    }

    #[test]
    fn tile_without_source_is_unsupported() {
        let set = tiles();
        let mut item = lifted(&set, 3);
        item.source_index = None;
        let session = DropSession::new(vec![item], DragOrigin::External);

        assert_eq!(
            DropTarget.resolve(&session, Some(4), 25, 0),
            DropAction::Ignore(IgnoredDrop::UnsupportedPayload)
        );
    }
}
