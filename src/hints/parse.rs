//! Parser for the instruction part of a recipe line
//!
//! Items are integers, `(x,y)` coordinate pairs or the quoted sidebearing
//! flags `"BL"` / `"BR"`. Anything else is rejected with a position.

use crate::data::Coord;

use super::instruction::{HintInstruction, HintKind, PointRef, Sidebearing};

/// Smallest instruction: kind code, one point, one parameter
const MIN_ITEMS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstructionError {
    #[error("empty instruction")]
    Empty,
    #[error("unexpected {found} at column {column} in '{text}'")]
    Syntax {
        text: String,
        column: usize,
        found: String,
    },
    #[error("the instruction code of '{text}' is not an integer")]
    BadKindCode { text: String },
    #[error("unknown instruction code {code} in '{text}'")]
    UnknownKind { text: String, code: i32 },
    #[error("'{text}' has {found} items, {needed} are required")]
    TooFewItems {
        text: String,
        found: usize,
        needed: usize,
    },
    #[error("item {position} of '{text}' should be {expected}")]
    WrongItem {
        text: String,
        position: usize,
        expected: &'static str,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Item {
    Int(i32),
    Coord(Coord),
    Flag(Sidebearing),
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self) -> InstructionError {
        let found = match self.text[self.pos..].chars().next() {
            Some(c) => format!("'{c}'"),
            None => "end of instruction".to_string(),
        };
        InstructionError::Syntax {
            text: self.text.to_string(),
            column: self.pos + 1,
            found,
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), InstructionError> {
        self.skip_whitespace();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn int(&mut self) -> Result<i32, InstructionError> {
        self.skip_whitespace();
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let digits = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits {
            self.pos = start;
            return Err(self.error());
        }
        self.text[start..self.pos].parse().map_err(|_| {
            self.pos = start;
            self.error()
        })
    }

    fn flag(&mut self, quote: u8) -> Result<Sidebearing, InstructionError> {
        let start = self.pos;
        self.pos += 1;
        let body = self.pos;
        while self.peek().is_some_and(|b| b != quote) {
            self.pos += 1;
        }
        let side = match &self.text[body..self.pos] {
            "BL" => Sidebearing::Left,
            "BR" => Sidebearing::Right,
            _ => {
                self.pos = start;
                return Err(self.error());
            }
        };
        self.expect(quote)?;
        Ok(side)
    }

    fn item(&mut self) -> Result<Item, InstructionError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let x = self.int()?;
                self.expect(b',')?;
                let y = self.int()?;
                self.expect(b')')?;
                Ok(Item::Coord(Coord::new(x, y)))
            }
            Some(quote @ (b'"' | b'\'')) => self.flag(quote).map(Item::Flag),
            _ => self.int().map(Item::Int),
        }
    }

    fn items(mut self) -> Result<Vec<Item>, InstructionError> {
        let mut items = Vec::new();
        loop {
            items.push(self.item()?);
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(items),
                Some(b',') => self.pos += 1,
                Some(_) => return Err(self.error()),
            }
        }
    }
}

/// Parses one instruction such as `4,(155,181),(180,249),0,-1`.
pub fn parse_instruction(text: &str) -> Result<HintInstruction, InstructionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InstructionError::Empty);
    }
    let items = Scanner::new(text).items()?;

    let code = match items[0] {
        Item::Int(code) => code,
        _ => {
            return Err(InstructionError::BadKindCode {
                text: text.to_string(),
            })
        }
    };
    let kind = HintKind::from_code(code).ok_or_else(|| InstructionError::UnknownKind {
        text: text.to_string(),
        code,
    })?;

    let needed = MIN_ITEMS.max(1 + kind.point_count() + kind.min_params());
    if items.len() < needed {
        return Err(InstructionError::TooFewItems {
            text: text.to_string(),
            found: items.len(),
            needed,
        });
    }

    let wrong = |position: usize, expected| InstructionError::WrongItem {
        text: text.to_string(),
        position: position + 1,
        expected,
    };

    let point_items = &items[1..1 + kind.point_count()];
    let mut points = Vec::with_capacity(point_items.len());
    for (offset, item) in point_items.iter().enumerate() {
        let point = match *item {
            Item::Int(index) => usize::try_from(index)
                .map(PointRef::Index)
                .map_err(|_| wrong(offset + 1, "a point index, coordinate or sidebearing flag"))?,
            Item::Coord(coord) => PointRef::Coord(coord),
            Item::Flag(side) => PointRef::Sidebearing(side),
        };
        points.push(point);
    }

    let first_param = 1 + kind.point_count();
    let mut params = Vec::with_capacity(items.len() - first_param);
    for (offset, item) in items[first_param..].iter().enumerate() {
        match *item {
            Item::Int(value) => params.push(value),
            _ => return Err(wrong(first_param + offset, "an integer parameter")),
        }
    }

    Ok(HintInstruction::new(kind, points, params))
}

/// Parses a `;` separated hint field. Bad instructions are returned next to
/// the good ones so the caller can report them and carry on with the glyph.
pub fn parse_instructions(field: &str) -> (Vec<HintInstruction>, Vec<InstructionError>) {
    let mut instructions = Vec::new();
    let mut errors = Vec::new();
    for text in field.split(';') {
        match parse_instruction(text) {
            Ok(instruction) => instructions.push(instruction),
            Err(err) => errors.push(err),
        }
    }
    (instructions, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::instruction::{format_instructions, Axis};

    #[test]
    fn parses_index_and_coordinate_forms() {
        let by_index = parse_instruction("4,6,9,0,-1").unwrap();
        assert_eq!(by_index.kind, HintKind::SingleLink(Axis::Vertical));
        assert_eq!(by_index.points, vec![PointRef::Index(6), PointRef::Index(9)]);
        assert_eq!(by_index.params, vec![0, -1]);

        let by_coord = parse_instruction("4,(155, 181),( 180,249 ),0,-1").unwrap();
        assert_eq!(
            by_coord.points,
            vec![
                PointRef::Coord(Coord::new(155, 181)),
                PointRef::Coord(Coord::new(180, 249))
            ]
        );
    }

    #[test]
    fn parses_sidebearing_flags_in_either_quote() {
        let link = parse_instruction("3,\"BL\",(83,0),0,-1").unwrap();
        assert_eq!(link.points[0], PointRef::Sidebearing(Sidebearing::Left));
        let link = parse_instruction("3,(83,0),'BR',0,-1").unwrap();
        assert_eq!(link.points[1], PointRef::Sidebearing(Sidebearing::Right));
    }

    #[test]
    fn interpolation_takes_three_points() {
        let interp = parse_instruction("14,4,9,21,0").unwrap();
        assert_eq!(interp.points.len(), 3);
        assert_eq!(interp.params, vec![0]);
    }

    #[test]
    fn rejects_short_and_malformed_instructions() {
        assert!(matches!(
            parse_instruction("1,9"),
            Err(InstructionError::TooFewItems { found: 2, needed: 3, .. })
        ));
        assert!(matches!(
            parse_instruction("21,9,1"),
            Err(InstructionError::TooFewItems { needed: 5, .. })
        ));
        assert!(matches!(
            parse_instruction("9,1,0"),
            Err(InstructionError::UnknownKind { code: 9, .. })
        ));
        assert!(matches!(
            parse_instruction("1,(1,2"),
            Err(InstructionError::Syntax { .. })
        ));
        assert!(matches!(
            parse_instruction("1,__import__('os'),0"),
            Err(InstructionError::Syntax { column: 3, .. })
        ));
        assert!(matches!(
            parse_instruction("1,9,(0,0)"),
            Err(InstructionError::WrongItem { position: 3, .. })
        ));
        assert!(matches!(
            parse_instruction("1,-4,0"),
            Err(InstructionError::WrongItem { position: 2, .. })
        ));
        assert_eq!(parse_instruction("  "), Err(InstructionError::Empty));
    }

    #[test]
    fn bad_instructions_do_not_hide_good_ones() {
        let (good, bad) = parse_instructions("1,9,0;1,x,0;2,0,0");
        assert_eq!(good.len(), 2);
        assert_eq!(bad.len(), 1);
    }

    /// Every point slot filled from `refs` in every combination
    fn point_combinations(slots: usize, refs: &[PointRef]) -> Vec<Vec<PointRef>> {
        (0..slots).fold(vec![Vec::new()], |combos, _| {
            combos
                .iter()
                .flat_map(|combo| {
                    refs.iter().map(move |point| {
                        let mut next = combo.clone();
                        next.push(*point);
                        next
                    })
                })
                .collect()
        })
    }

    #[test]
    fn every_instruction_survives_text_and_back() {
        let refs = [
            PointRef::Index(0),
            PointRef::Index(417),
            PointRef::Coord(Coord::new(-35, 1200)),
            PointRef::Coord(Coord::new(0, -1)),
            PointRef::Sidebearing(Sidebearing::Left),
            PointRef::Sidebearing(Sidebearing::Right),
        ];
        let kinds: Vec<HintKind> = (0..=30).filter_map(HintKind::from_code).collect();
        assert_eq!(kinds.len(), 14);

        let mut checked = 0;
        for kind in kinds {
            assert_eq!(HintKind::from_code(kind.code()), Some(kind));
            let min = kind.min_params();
            let param_sets = [vec![-1; min], (0..=min as i32).map(|p| p * 7 - 8).collect()];
            for points in point_combinations(kind.point_count(), &refs) {
                for params in &param_sets {
                    let instruction = HintInstruction::new(kind, points.clone(), params.clone());
                    let text = instruction.to_string();
                    let parsed = parse_instruction(&text).unwrap();
                    assert_eq!(parsed, instruction, "{text}");
                    assert_eq!(parsed.to_string(), text);
                    checked += 1;
                }
            }
        }
        // 8 kinds take 1 point, 4 take 2, 2 take 3; two param sets each
        assert_eq!(checked, 2 * (8 * 6 + 4 * 36 + 2 * 216));
    }

    #[test]
    fn serialize_then_parse_is_identity() {
        for field in [
            "5,13,14,1;5,22,0,1;1,9,0;1,2,0;2,0,0;2,14,0;14,4,9,0,0;4,9,18,0,-1",
            "4,(155,181),(180,249),0,-1;3,\"BL\",(83,0),0,-1;21,(10,-20),1,8,12",
        ] {
            let (instructions, errors) = parse_instructions(field);
            assert!(errors.is_empty());
            assert_eq!(format_instructions(&instructions), field);
            let (again, _) = parse_instructions(&format_instructions(&instructions));
            assert_eq!(again, instructions);
        }
    }
}
