//! Authoritative position state: piece lists kept in bijection with an
//! 8×8 square index, three-valued auxiliary state, and the fixed-width
//! packed form stored by the search frontiers.
//!
//! The record format accepted by [`Position::from_fen`] extends FEN:
//! `?` marks an explicitly unknown castling, en-passant or counter
//! slot, and absent trailing fields default to unknown/unlogged.

use std::fmt;

use anyhow::bail;

use crate::chess::core::{
    piece_from_fen_symbol, CastlingSide, Piece, PieceCounts, PieceKind, Player, Square, Ternary,
};

/// Piece placement of the standard starting array.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Move counters beyond this bound are rejected at parse time so that
/// they always fit the 16-bit packed fields.
pub const MAX_COUNTER: u16 = 30_000;

/// Piece lists reserve one slot beyond the legal 16: retraction may
/// restore a 17th piece that validation then discards.
const PIECE_LIST_CAPACITY: usize = 17;

const PACKED_BITS: usize = 304;
const PACKED_WORDS: usize = PACKED_BITS.div_ceil(64);
const PACKED_EMPTY_SQUARE: u64 = 0b1111;

/// A square index cell: which side's list the occupant lives in, and
/// where. Indices are invalidated by any removal on that side
/// (swap-with-last); hold squares, not indices, across mutations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Occupant {
    #[allow(missing_docs)]
    pub player: Player,
    #[allow(missing_docs)]
    pub index: usize,
}

/// The fixed 304-bit serialized form of a [`Position`]: turn (1),
/// 64 squares × 4 (file-major, `0b1111` empty, else `side << 3 | kind`),
/// five ternaries × 2 (False = `00`, True = `01`, Unknown = `11`),
/// en-passant file (3), and two log-flag + 16-bit counter pairs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackedPosition {
    words: [u64; PACKED_WORDS],
}

fn write_bits(words: &mut [u64; PACKED_WORDS], at: &mut usize, value: u64, bits: u32) {
    for bit in (0..bits).rev() {
        if value >> bit & 1 == 1 {
            words[*at / 64] |= 1 << (*at % 64);
        }
        *at += 1;
    }
}

fn read_bits(words: &[u64; PACKED_WORDS], at: &mut usize, bits: u32) -> u64 {
    let mut value = 0;
    for _ in 0..bits {
        value = (value << 1) | (words[*at / 64] >> (*at % 64) & 1);
        *at += 1;
    }
    value
}

fn write_ternary(words: &mut [u64; PACKED_WORDS], at: &mut usize, value: Ternary) {
    let encoded = match value {
        Ternary::False => 0b00,
        Ternary::True => 0b01,
        Ternary::Unknown => 0b11,
    };
    write_bits(words, at, encoded, 2);
}

fn read_ternary(words: &[u64; PACKED_WORDS], at: &mut usize) -> Ternary {
    match read_bits(words, at, 2) {
        0b00 => Ternary::False,
        0b01 => Ternary::True,
        _ => Ternary::Unknown,
    }
}

/// Authoritative game state. See the module docs for the record format.
#[derive(Clone, Debug)]
pub struct Position {
    white_pieces: Vec<Piece>,
    black_pieces: Vec<Piece>,
    white_counts: PieceCounts,
    black_counts: PieceCounts,
    squares: [[Option<Occupant>; 8]; 8],
    turn: Player,
    castling: [[Ternary; 2]; 2],
    en_passant: Ternary,
    en_passant_file: i8,
    half_move_log: bool,
    half_moves: u16,
    full_move_log: bool,
    full_moves: u16,
}

impl Default for Position {
    /// An empty board with White to move and every auxiliary field
    /// unknown/unlogged.
    fn default() -> Self {
        Self {
            white_pieces: Vec::with_capacity(PIECE_LIST_CAPACITY),
            black_pieces: Vec::with_capacity(PIECE_LIST_CAPACITY),
            white_counts: PieceCounts::default(),
            black_counts: PieceCounts::default(),
            squares: [[None; 8]; 8],
            turn: Player::White,
            castling: [[Ternary::Unknown; 2]; 2],
            en_passant: Ternary::Unknown,
            en_passant_file: 0,
            half_move_log: false,
            half_moves: 0,
            full_move_log: false,
            full_moves: 0,
        }
    }
}

impl Position {
    /// The canonical starting position: full castling rights, no
    /// en passant, counters at 0 and 1.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut position = Self::default();
        for (file, kind) in (0i8..).zip(BACKRANK) {
            position.add_piece(Square::new(file, 0), kind, Player::White);
            position.add_piece(Square::new(file, 1), PieceKind::Pawn, Player::White);
            position.add_piece(Square::new(file, 7), kind, Player::Black);
            position.add_piece(Square::new(file, 6), PieceKind::Pawn, Player::Black);
        }
        position.castling = [[Ternary::True; 2]; 2];
        position.en_passant = Ternary::False;
        position.set_half_moves(true, 0);
        position.set_full_moves(true, 1);
        position
    }

    #[must_use]
    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn set_turn(&mut self, player: Player) {
        self.turn = player;
    }

    #[must_use]
    pub fn castling(&self, player: Player, side: CastlingSide) -> Ternary {
        self.castling[player as usize][side as usize]
    }

    pub fn set_castling(&mut self, player: Player, side: CastlingSide, state: Ternary) {
        self.castling[player as usize][side as usize] = state;
    }

    #[must_use]
    pub fn en_passant(&self) -> Ternary {
        self.en_passant
    }

    /// Meaningful only while [`Position::en_passant`] is `True`.
    #[must_use]
    pub fn en_passant_file(&self) -> i8 {
        self.en_passant_file
    }

    pub fn set_en_passant(&mut self, state: Ternary, file: i8) {
        self.en_passant = state;
        self.en_passant_file = file;
    }

    #[must_use]
    pub fn half_move_log(&self) -> bool {
        self.half_move_log
    }

    #[must_use]
    pub fn half_moves(&self) -> u16 {
        self.half_moves
    }

    pub fn set_half_moves(&mut self, log: bool, counter: u16) {
        self.half_move_log = log;
        self.half_moves = counter;
    }

    pub fn increment_half_moves(&mut self) {
        self.half_moves += 1;
    }

    pub fn decrement_half_moves(&mut self) {
        self.half_moves -= 1;
    }

    #[must_use]
    pub fn full_move_log(&self) -> bool {
        self.full_move_log
    }

    #[must_use]
    pub fn full_moves(&self) -> u16 {
        self.full_moves
    }

    pub fn set_full_moves(&mut self, log: bool, counter: u16) {
        self.full_move_log = log;
        self.full_moves = counter;
    }

    pub fn increment_full_moves(&mut self) {
        self.full_moves += 1;
    }

    pub fn decrement_full_moves(&mut self) {
        self.full_moves -= 1;
    }

    /// Number of plies completed before this position, when the
    /// full-move counter is logged.
    #[must_use]
    pub fn ply_counter(&self) -> Option<u32> {
        if !self.full_move_log {
            return None;
        }
        Some((u32::from(self.full_moves) * 2).saturating_sub(u32::from(self.turn == Player::White)))
    }

    /// Moves the given side has completed, when the full-move counter
    /// is logged.
    #[must_use]
    pub fn completed_moves(&self, player: Player) -> Option<u32> {
        if !self.full_move_log {
            return None;
        }
        let full_moves = u32::from(self.full_moves);
        Some(if self.turn == Player::Black && player == Player::White {
            full_moves
        } else {
            full_moves.saturating_sub(1)
        })
    }

    #[must_use]
    pub fn pieces(&self, player: Player) -> &[Piece] {
        match player {
            Player::White => &self.white_pieces,
            Player::Black => &self.black_pieces,
        }
    }

    #[must_use]
    pub fn piece_counts(&self, player: Player) -> &PieceCounts {
        match player {
            Player::White => &self.white_counts,
            Player::Black => &self.black_counts,
        }
    }

    /// The side's king; every validated position has exactly one.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<&Piece> {
        self.pieces(player)
            .iter()
            .find(|piece| piece.kind == PieceKind::King)
    }

    #[must_use]
    pub fn occupant(&self, square: Square) -> Option<Occupant> {
        self.squares[square.file() as usize][square.rank() as usize]
    }

    #[must_use]
    pub fn piece_on(&self, square: Square) -> Option<&Piece> {
        self.occupant(square)
            .map(|occupant| &self.pieces(occupant.player)[occupant.index])
    }

    #[must_use]
    pub fn is_square_empty(&self, square: Square) -> bool {
        self.occupant(square).is_none()
    }

    #[must_use]
    pub fn is_piece_on(&self, square: Square, player: Player, kind: PieceKind) -> bool {
        self.piece_on(square)
            .is_some_and(|piece| piece.player == player && piece.kind == kind)
    }

    fn cell_mut(&mut self, square: Square) -> &mut Option<Occupant> {
        &mut self.squares[square.file() as usize][square.rank() as usize]
    }

    fn update_counts(&mut self, piece: &Piece, delta: i8) {
        let counts = match piece.player {
            Player::White => &mut self.white_counts,
            Player::Black => &mut self.black_counts,
        };
        match piece.kind {
            PieceKind::Queen => counts.queens += delta,
            PieceKind::Rook => counts.rooks += delta,
            PieceKind::Bishop => {
                if piece.square.is_dark() {
                    counts.dark_bishops += delta;
                } else {
                    counts.light_bishops += delta;
                }
            }
            PieceKind::Knight => counts.knights += delta,
            PieceKind::Pawn => counts.pawns += delta,
            PieceKind::King => {}
        }
    }

    /// Appends a piece to the owning list and indexes its square.
    pub fn add_piece(&mut self, square: Square, kind: PieceKind, player: Player) {
        let piece = Piece {
            kind,
            player,
            square,
        };
        let pieces = match player {
            Player::White => &mut self.white_pieces,
            Player::Black => &mut self.black_pieces,
        };
        let index = pieces.len();
        pieces.push(piece);
        *self.cell_mut(square) = Some(Occupant { player, index });
        self.update_counts(&piece, 1);
    }

    /// Removes the piece on `square`, swapping it with the last piece
    /// of its list so the list stays dense. The swapped-in piece's
    /// index cell is rewritten; any previously held index on that side
    /// is invalid afterwards.
    pub fn remove_piece(&mut self, square: Square) {
        let Some(occupant) = self.occupant(square) else {
            return;
        };
        let pieces = match occupant.player {
            Player::White => &mut self.white_pieces,
            Player::Black => &mut self.black_pieces,
        };
        let last = pieces.len() - 1;
        pieces.swap(occupant.index, last);
        let swapped_square = pieces[occupant.index].square;
        if let Some(removed) = pieces.pop() {
            if occupant.index != last {
                self.squares[swapped_square.file() as usize][swapped_square.rank() as usize] =
                    Some(occupant);
            }
            *self.cell_mut(square) = None;
            self.update_counts(&removed, -1);
        }
    }

    /// Relocates a piece, rewriting both index cells.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let Some(occupant) = self.occupant(from) else {
            return;
        };
        let pieces = match occupant.player {
            Player::White => &mut self.white_pieces,
            Player::Black => &mut self.black_pieces,
        };
        pieces[occupant.index].square = to;
        *self.cell_mut(to) = Some(occupant);
        *self.cell_mut(from) = None;
    }

    /// Renders the 8-rank placement field of FEN, optionally followed
    /// by the side to move.
    #[must_use]
    pub fn to_fen_placement(&self, include_turn: bool) -> String {
        let mut result = String::new();
        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.piece_on(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            result.push(char::from(b'0' + empty_run));
                            empty_run = 0;
                        }
                        result.push(piece.fen_symbol());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                result.push(char::from(b'0' + empty_run));
            }
            if rank > 0 {
                result.push('/');
            }
        }
        if include_turn {
            result.push(' ');
            result.push(match self.turn {
                Player::White => 'w',
                Player::Black => 'b',
            });
        }
        result
    }

    fn counter_refines(self_log: bool, own: u16, other_log: bool, other: u16) -> bool {
        !other_log || (self_log && own == other)
    }

    /// Whether this position is a concrete refinement of `other`: same
    /// turn and placement, every auxiliary ternary refines the other's
    /// (equal, or the other is Unknown), matching en-passant files when
    /// both are True, and counter agreement wherever `other` logs a
    /// counter. The bidirectional join predicate: the forward frontier
    /// carries fully determined state, the backward frontier may not.
    #[must_use]
    pub fn can_be_specialization_of(&self, other: &Self) -> bool {
        use strum::IntoEnumIterator;

        self.turn == other.turn
            && self.to_fen_placement(false) == other.to_fen_placement(false)
            && Player::iter().all(|player| {
                CastlingSide::iter().all(|side| {
                    self.castling(player, side).refines(other.castling(player, side))
                })
            })
            && self.en_passant.refines(other.en_passant)
            && !(self.en_passant == Ternary::True
                && other.en_passant == Ternary::True
                && self.en_passant_file != other.en_passant_file)
            && Self::counter_refines(
                self.half_move_log,
                self.half_moves,
                other.half_move_log,
                other.half_moves,
            )
            && Self::counter_refines(
                self.full_move_log,
                self.full_moves,
                other.full_move_log,
                other.full_moves,
            )
    }

    /// Serializes the position into its fixed-width packed form.
    #[must_use]
    pub fn pack(&self) -> PackedPosition {
        let mut words = [0; PACKED_WORDS];
        let mut at = 0;
        write_bits(&mut words, &mut at, self.turn as u64, 1);
        for file in 0..8 {
            for rank in 0..8 {
                let value = match self.piece_on(Square::new(file, rank)) {
                    Some(piece) => ((piece.player as u64) << 3) | piece.kind as u64,
                    None => PACKED_EMPTY_SQUARE,
                };
                write_bits(&mut words, &mut at, value, 4);
            }
        }
        for player in [Player::White, Player::Black] {
            for side in [CastlingSide::Kingside, CastlingSide::Queenside] {
                write_ternary(&mut words, &mut at, self.castling(player, side));
            }
        }
        write_ternary(&mut words, &mut at, self.en_passant);
        write_bits(&mut words, &mut at, self.en_passant_file as u64, 3);
        write_bits(&mut words, &mut at, u64::from(self.half_move_log), 1);
        write_bits(&mut words, &mut at, u64::from(self.half_moves), 16);
        write_bits(&mut words, &mut at, u64::from(self.full_move_log), 1);
        write_bits(&mut words, &mut at, u64::from(self.full_moves), 16);
        PackedPosition { words }
    }

    /// Reconstructs a position from its packed form; exact on every
    /// field [`Position::pack`] stores.
    #[must_use]
    pub fn unpack(packed: &PackedPosition) -> Self {
        let words = &packed.words;
        let mut position = Self::default();
        let mut at = 0;
        position.turn = if read_bits(words, &mut at, 1) == 0 {
            Player::White
        } else {
            Player::Black
        };
        for file in 0..8 {
            for rank in 0..8 {
                let value = read_bits(words, &mut at, 4);
                if value == PACKED_EMPTY_SQUARE {
                    continue;
                }
                let player = if value >> 3 == 0 {
                    Player::White
                } else {
                    Player::Black
                };
                if let Some(kind) = PieceKind::from_packed((value & 0b111) as u8) {
                    position.add_piece(Square::new(file, rank), kind, player);
                }
            }
        }
        for player in [Player::White, Player::Black] {
            for side in [CastlingSide::Kingside, CastlingSide::Queenside] {
                let state = read_ternary(words, &mut at);
                position.set_castling(player, side, state);
            }
        }
        position.en_passant = read_ternary(words, &mut at);
        position.en_passant_file = read_bits(words, &mut at, 3) as i8;
        position.half_move_log = read_bits(words, &mut at, 1) == 1;
        position.half_moves = read_bits(words, &mut at, 16) as u16;
        position.full_move_log = read_bits(words, &mut at, 1) == 1;
        position.full_moves = read_bits(words, &mut at, 16) as u16;
        position
    }

    /// Parses the extended FEN record. Placement and side to move are
    /// required; castling, en passant and the counters are optional and
    /// accept `?` for an explicitly unknown slot. The result is not yet
    /// vetted for semantic legality; see
    /// [`crate::chess::validate::validate_and_stricten`].
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        if input.is_empty() {
            bail!("no input was provided");
        }
        let bytes = input.as_bytes();
        let mut position = Self::default();
        let mut at = 0;
        read_placement(bytes, &mut at, &mut position)?;
        read_side(bytes, &mut at, &mut position)?;
        read_castling(bytes, &mut at, &mut position)?;
        read_en_passant(bytes, &mut at, &mut position)?;
        read_counter(bytes, &mut at, &mut position, CounterSlot::Half)?;
        read_counter(bytes, &mut at, &mut position, CounterSlot::Full)?;
        while at < bytes.len() && bytes[at] == b' ' {
            at += 1;
        }
        if at != bytes.len() {
            bail!("unexpected continuation of record after position {at}");
        }
        Ok(position)
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_fen(input.trim())
    }
}

impl fmt::Display for Position {
    /// The placement field plus the side to move.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_fen_placement(true))
    }
}

fn ensure_chars_left(bytes: &[u8], at: usize, trailing_space_hint: bool) -> anyhow::Result<()> {
    if at >= bytes.len() {
        bail!(
            "unexpected end of record after position {at}{}",
            if trailing_space_hint {
                " (did you leave whitespace after the notation?)"
            } else {
                ""
            }
        );
    }
    Ok(())
}

/// Consumes the separator before an optional field. `Ok(false)` means
/// the record ended and the field defaults to unknown/unlogged.
fn try_read_space(bytes: &[u8], at: &mut usize) -> anyhow::Result<bool> {
    if *at >= bytes.len() {
        return Ok(false);
    }
    if bytes[*at] != b' ' {
        bail!("expected space at position {}", *at + 1);
    }
    *at += 1;
    Ok(true)
}

fn read_placement(bytes: &[u8], at: &mut usize, position: &mut Position) -> anyhow::Result<()> {
    let mut rank = 7;
    let mut file = 0;
    loop {
        if *at >= bytes.len() || bytes[*at] == b' ' {
            bail!(
                "piece placement description ended unexpectedly after position {}",
                *at
            );
        }
        let c = bytes[*at] as char;
        if file == 8 && c != '/' {
            bail!(
                "too many squares in piece placement description for rank {}",
                rank + 1
            );
        }
        if c == '/' {
            if file == 8 {
                file = 0;
                rank -= 1;
            } else {
                bail!(
                    "too few squares in piece placement description for rank {}",
                    rank + 1
                );
            }
        } else if c.is_ascii_digit() && c != '0' && c != '9' {
            file += c as i8 - '0' as i8;
            if file > 8 {
                bail!(
                    "too many squares in piece placement description for rank {}",
                    rank + 1
                );
            }
        } else {
            match piece_from_fen_symbol(c) {
                Ok((kind, player)) => position.add_piece(Square::new(file, rank), kind, player),
                Err(_) => bail!(
                    "invalid character '{c}' at position {} in piece placement description",
                    *at + 1
                ),
            }
            file += 1;
        }
        *at += 1;
        if file == 8 && rank == 0 {
            return Ok(());
        }
    }
}

fn read_side(bytes: &[u8], at: &mut usize, position: &mut Position) -> anyhow::Result<()> {
    if *at >= bytes.len() {
        bail!("turn must be specified for the position");
    }
    if bytes[*at] != b' ' {
        bail!("expected space at position {}", *at + 1);
    }
    *at += 1;
    ensure_chars_left(bytes, *at, false)?;
    match bytes[*at] {
        b'w' => position.set_turn(Player::White),
        b'b' => position.set_turn(Player::Black),
        c => bail!(
            "invalid character '{}' at position {} (expected 'w' for white or 'b' for black)",
            c as char,
            *at + 1
        ),
    }
    *at += 1;
    Ok(())
}

fn read_castling(bytes: &[u8], at: &mut usize, position: &mut Position) -> anyhow::Result<()> {
    if !try_read_space(bytes, at)? {
        return Ok(());
    }
    ensure_chars_left(bytes, *at, true)?;
    if bytes[*at] == b'?' {
        *at += 1;
        return Ok(());
    }
    for player in [Player::White, Player::Black] {
        for side in [CastlingSide::Kingside, CastlingSide::Queenside] {
            position.set_castling(player, side, Ternary::False);
        }
    }
    if bytes[*at] == b'-' {
        *at += 1;
        return Ok(());
    }
    if bytes[*at] == b' ' {
        bail!(
            "unexpected space at position {} (expected 'K', 'Q', 'k', or 'q'; \
             you can also use '-' or '?' for the whole castling slot)",
            *at + 1
        );
    }
    while *at < bytes.len() {
        let (player, side) = match bytes[*at] {
            b' ' => break,
            b'K' => (Player::White, CastlingSide::Kingside),
            b'Q' => (Player::White, CastlingSide::Queenside),
            b'k' => (Player::Black, CastlingSide::Kingside),
            b'q' => (Player::Black, CastlingSide::Queenside),
            c => bail!(
                "invalid character '{}' at position {} (expected 'K', 'Q', 'k', or 'q'; \
                 you can also use '-' or '?' for the whole castling slot)",
                c as char,
                *at + 1
            ),
        };
        position.set_castling(player, side, Ternary::True);
        *at += 1;
    }
    Ok(())
}

fn read_en_passant(bytes: &[u8], at: &mut usize, position: &mut Position) -> anyhow::Result<()> {
    if !try_read_space(bytes, at)? {
        return Ok(());
    }
    ensure_chars_left(bytes, *at, true)?;
    let c = bytes[*at] as char;
    *at += 1;
    match c {
        '-' => position.set_en_passant(Ternary::False, 0),
        'a'..='h' => {
            position.set_en_passant(Ternary::True, c as i8 - 'a' as i8);
            if *at >= bytes.len() {
                bail!(
                    "unexpected end of record after position {} (expected rank of the \
                     en passant square)",
                    *at
                );
            }
            let expected = match position.turn() {
                Player::White => b'6',
                Player::Black => b'3',
            };
            if bytes[*at] != expected {
                bail!(
                    "unexpected rank '{}' at position {} (expected '{}')",
                    bytes[*at] as char,
                    *at + 1,
                    expected as char
                );
            }
            *at += 1;
        }
        '?' => {}
        _ => bail!(
            "invalid character '{c}' at position {} (expected '-', '?', or file 'a' through 'h' \
             for the en passant square)",
            *at
        ),
    }
    Ok(())
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum CounterSlot {
    Half,
    Full,
}

impl CounterSlot {
    fn name(self) -> &'static str {
        match self {
            Self::Half => "half",
            Self::Full => "full",
        }
    }
}

fn read_counter(
    bytes: &[u8],
    at: &mut usize,
    position: &mut Position,
    slot: CounterSlot,
) -> anyhow::Result<()> {
    if !try_read_space(bytes, at)? {
        return Ok(());
    }
    ensure_chars_left(bytes, *at, true)?;
    if bytes[*at] == b'?' {
        *at += 1;
        return Ok(());
    }
    if bytes[*at] == b' ' {
        bail!(
            "unexpected space at position {} (expected {}-move counter instead)",
            *at + 1,
            slot.name()
        );
    }
    let mut counter: u16 = 0;
    while *at < bytes.len() {
        let c = bytes[*at];
        if c == b' ' {
            break;
        }
        if c.is_ascii_digit() {
            counter = counter
                .saturating_mul(10)
                .saturating_add(u16::from(c - b'0'));
            if counter > MAX_COUNTER {
                bail!("{}-move counter is too large", slot.name());
            }
            *at += 1;
        } else {
            bail!(
                "invalid character '{}' at position {} (expected a digit of the {}-move \
                 counter; you can also use '?' for the slot)",
                c as char,
                *at + 1,
                slot.name()
            );
        }
    }
    match slot {
        CounterSlot::Half => position.set_half_moves(true, counter),
        CounterSlot::Full => position.set_full_moves(true, counter),
    }
    Ok(())
}
