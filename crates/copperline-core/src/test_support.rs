//! Shared board fixtures for unit tests.

use crate::board::Board;
use crate::connectivity::{NetSegment, SegmentId};
use crate::items::{Device, FootprintPad, ItemId, NetLine, NetPoint, Via};
use kurbo::{Point, Size, Vec2};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A device pad routed through two net points to a via.
///
/// ```text
///            p1 (10,10) ──── via (20,10)
///             │
/// pad (0,0) ─ p0 (10,0)
/// ```
///
/// Every trace is 10 mm long.
pub(crate) struct TraceFixture {
    pub board: Board,
    pub segment: SegmentId,
    pub device: ItemId,
    pub pad_a: ItemId,
    pub points: Vec<ItemId>,
    pub via: ItemId,
    pub lines: Vec<ItemId>,
}

impl TraceFixture {
    pub fn new() -> Self {
        init_logging();
        let mut board = Board::new("fixture");
        let segment = board.add_segment(NetSegment::new("N1"));

        let mut device = Device::new("U1", Point::ZERO, Size::new(2.0, 2.0));
        let pad = FootprintPad::new(&mut device, "1", Vec2::ZERO, Size::new(1.0, 1.0));
        let device = add(&mut board, device);
        let pad_a = add(&mut board, pad);

        let p0 = add(&mut board, NetPoint::new(segment, Point::new(10.0, 0.0)));
        let p1 = add(&mut board, NetPoint::new(segment, Point::new(10.0, 10.0)));
        let via = add(&mut board, Via::new(segment, Point::new(20.0, 10.0)));

        let lines = [(pad_a, p0), (p0, p1), (p1, via)]
            .into_iter()
            .map(|(a, b)| add(&mut board, NetLine::new(segment, a, b, 0.25)))
            .collect();

        Self {
            board,
            segment,
            device,
            pad_a,
            points: vec![p0, p1],
            via,
            lines,
        }
    }

    pub fn select(&mut self, ids: &[ItemId]) {
        self.board.clear_selection();
        for &id in ids {
            self.board.set_selected(id, true);
        }
    }
}

fn add(board: &mut Board, item: impl Into<crate::items::BoardItem>) -> ItemId {
    match board.add_item(item) {
        Ok(id) => id,
        Err(e) => panic!("fixture item rejected: {e}"),
    }
}
