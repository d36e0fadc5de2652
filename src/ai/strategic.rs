//! Threat evaluation built on Connect Four parity theory.
//!
//! A group is one of the four-cell lines that only one side occupies. Each
//! rule looks at how gravity and alternating turns decide who gets the
//! group's empty cells, and scores the result in favor of or against the
//! evaluating player. Contributions grow with how many pieces the group
//! already holds.

use crate::game::{row_from_bottom, Board, Cell, Line, Player, LINES, ROWS};

pub const CLAIMEVEN: i32 = 3;
pub const BASEINVERSE: i32 = 2;
pub const VERTICAL: i32 = 2;
pub const BEFORE: i32 = 1;
pub const AFTEREVEN: i32 = 4;
pub const LOWINVERSE: i32 = 2;

/// Which side made the first move. More pieces means that side started;
/// on equal counts the side to move started.
pub fn first_mover(board: &Board, to_move: Player) -> Player {
    let red = board.count(Player::Red);
    let yellow = board.count(Player::Yellow);
    if red > yellow {
        Player::Red
    } else if yellow > red {
        Player::Yellow
    } else {
        to_move
    }
}

/// True if `row` has the parity `player` can expect to claim: odd rows
/// (counted from the bottom) for the first mover, even rows for the second.
pub fn favors(row: usize, player: Player, first: Player) -> bool {
    let odd = row_from_bottom(row) % 2 == 1;
    odd == (player == first)
}

/// A live line occupied by exactly one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub cells: Line,
    pub owner: Player,
    pub filled: usize,
    empties: [(usize, usize); 4],
    empty_count: usize,
}

impl Group {
    pub fn empties(&self) -> &[(usize, usize)] {
        &self.empties[..self.empty_count]
    }

    /// Lowest empty cell on the board (largest row index).
    pub fn lowest_empty(&self) -> Option<(usize, usize)> {
        self.empties().iter().copied().max_by_key(|&(row, _)| row)
    }

    fn weight(&self) -> i32 {
        1 << (self.filled - 1)
    }
}

/// Groups holding one to three pieces of a single side.
pub fn live_groups(board: &Board) -> Vec<Group> {
    let mut groups = Vec::new();
    for line in LINES.iter() {
        let mut owner = None;
        let mut dead = false;
        let mut filled = 0;
        let mut empties = [(0, 0); 4];
        let mut empty_count = 0;

        for &(row, col) in line {
            match board.get(row, col).player() {
                None => {
                    empties[empty_count] = (row, col);
                    empty_count += 1;
                }
                Some(p) => {
                    filled += 1;
                    match owner {
                        None => owner = Some(p),
                        Some(o) if o != p => dead = true,
                        Some(_) => {}
                    }
                }
            }
        }

        if let (Some(owner), false) = (owner, dead) {
            if empty_count > 0 {
                groups.push(Group {
                    cells: *line,
                    owner,
                    filled,
                    empties,
                    empty_count,
                });
            }
        }
    }
    groups
}

/// Everything the rules need, computed once per evaluation.
pub struct ThreatContext<'a> {
    pub board: &'a Board,
    pub player: Player,
    pub first: Player,
    pub groups: Vec<Group>,
}

impl<'a> ThreatContext<'a> {
    pub fn new(board: &'a Board, player: Player) -> Self {
        ThreatContext {
            board,
            player,
            first: first_mover(board, player),
            groups: live_groups(board),
        }
    }

    /// `value` credited to `beneficiary`, seen from the evaluating player.
    fn signed(&self, beneficiary: Player, value: i32) -> i32 {
        if beneficiary == self.player {
            value
        } else {
            -value
        }
    }

    fn all_favor_owner(&self, group: &Group) -> bool {
        group
            .empties()
            .iter()
            .all(|&(row, _)| favors(row, group.owner, self.first))
    }

    fn empty_below(&self, row: usize, col: usize) -> bool {
        row + 1 < ROWS && self.board.get(row + 1, col) == Cell::Empty
    }

    fn empties_in_column(&self, col: usize) -> usize {
        ROWS - self.board.height(col)
    }
}

/// Groups whose empty cells all lie on the owner's parity rows.
pub fn claimeven(ctx: &ThreatContext) -> i32 {
    ctx.groups
        .iter()
        .filter(|g| ctx.all_favor_owner(g))
        .map(|g| ctx.signed(g.owner, CLAIMEVEN * g.weight()))
        .sum()
}

/// Groups that need two directly playable cells: the other side can always
/// answer one with the other.
pub fn baseinverse(ctx: &ThreatContext) -> i32 {
    ctx.groups
        .iter()
        .filter(|g| {
            g.empties()
                .iter()
                .filter(|&&(row, col)| ctx.board.is_playable(row, col))
                .count()
                >= 2
        })
        .map(|g| ctx.signed(g.owner.other(), BASEINVERSE * g.weight()))
        .sum()
}

/// Empty cells sitting on an odd row above another empty cell go to the
/// first mover, helping the first mover's groups and hurting the second's.
pub fn vertical(ctx: &ThreatContext) -> i32 {
    ctx.groups
        .iter()
        .map(|g| {
            let pairs = g
                .empties()
                .iter()
                .filter(|&&(row, col)| row_from_bottom(row) % 2 == 1 && ctx.empty_below(row, col))
                .count() as i32;
            let value = VERTICAL * g.weight() * pairs;
            if g.owner == ctx.first {
                ctx.signed(g.owner, value)
            } else {
                ctx.signed(g.owner, -value)
            }
        })
        .sum()
}

/// A group is devalued when an opposing group with at least two pieces can
/// be completed first: its lowest empty cell is playable now and sits at or
/// below this group's lowest empty cell.
pub fn before(ctx: &ThreatContext) -> i32 {
    ctx.groups
        .iter()
        .filter(|target| {
            let Some((target_row, _)) = target.lowest_empty() else {
                return false;
            };
            ctx.groups.iter().any(|g| {
                g.owner != target.owner
                    && g.filled >= 2
                    && g.lowest_empty().is_some_and(|(row, col)| {
                        ctx.board.is_playable(row, col) && row >= target_row
                    })
            })
        })
        .map(|target| ctx.signed(target.owner, -BEFORE * target.weight()))
        .sum()
}

/// Claimeven groups whose every empty cell has an empty cell beneath it:
/// the owner can follow up in each column and complete the group.
pub fn aftereven(ctx: &ThreatContext) -> i32 {
    ctx.groups
        .iter()
        .filter(|g| {
            ctx.all_favor_owner(g)
                && g.empties()
                    .iter()
                    .all(|&(row, col)| ctx.empty_below(row, col))
        })
        .map(|g| ctx.signed(g.owner, AFTEREVEN * g.weight()))
        .sum()
}

/// Groups needing the lowest cells of two columns that each have two or
/// more empties: the other side is guaranteed one of them.
pub fn lowinverse(ctx: &ThreatContext) -> i32 {
    ctx.groups
        .iter()
        .filter(|g| {
            g.empties()
                .iter()
                .filter(|&&(row, col)| {
                    ctx.board.is_playable(row, col) && ctx.empties_in_column(col) >= 2
                })
                .count()
                >= 2
        })
        .map(|g| ctx.signed(g.owner.other(), LOWINVERSE * g.weight()))
        .sum()
}

/// Sum of all six rules for `player`.
pub fn threat_score(board: &Board, player: Player) -> i32 {
    let ctx = ThreatContext::new(board, player);
    if ctx.groups.is_empty() {
        return 0;
    }
    claimeven(&ctx)
        + baseinverse(&ctx)
        + vertical(&ctx)
        + before(&ctx)
        + aftereven(&ctx)
        + lowinverse(&ctx)
}
