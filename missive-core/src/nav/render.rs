//! Screen layout
//!
//! ```text
//!  col 0       8       15
//! 0  nn/mm     HH:MM:SS     position/count, system clock
//! 1  ................       \
//! 2  ................        | message page (4 x 16)
//! 3  ................        |
//! 4  ................       /
//! 5  @HH:MM:SS +n   ^v      message time, part tag, scroll marks
//! 6  Delete? Yes No         delete prompt
//! 7                         (blank)
//! ```

use core::fmt::Write;

use heapless::String;
use missive_display::{Colors, TextDisplay};

use super::machine::{Choice, Mode, Navigator};
use crate::clock::Timestamp;
use crate::message::{Message, LINE_WIDTH, PAGE_LINES};
use crate::store::MessageStore;

/// Header row
pub const HEADER_ROW: u8 = 0;
/// First row of the message page
pub const PAGE_ROW: u8 = 1;
/// Message time / part tag row
pub const FOOTER_ROW: u8 = 5;
/// Delete prompt row
pub const PROMPT_ROW: u8 = 6;

/// Width reserved for the position/count field
const POSITION_WIDTH: u8 = 8;
/// Column where the system clock starts
pub const CLOCK_COL: u8 = 8;

const PART_TAG_COL: u8 = 10;
const SCROLL_UP_COL: u8 = 14;
const SCROLL_DOWN_COL: u8 = 15;
const YES_COL: u8 = 8;
const NO_COL: u8 = 12;

const PLACEHOLDER: &str = "  No messages";

/// Redraw every row
pub fn render_all<D: TextDisplay, const N: usize>(
    display: &mut D,
    store: &MessageStore<N>,
    nav: &Navigator,
    clock: Timestamp,
) -> Result<(), D::Error> {
    display.clear()?;
    render_header(display, store, nav)?;
    render_clock(display, clock)?;

    let cursor = nav.cursor();
    match cursor.message.and_then(|handle| store.get(handle)) {
        Some(message) => {
            render_page(display, message, cursor.row)?;
            render_footer(display, message, cursor.row)?;
        }
        None => {
            display.draw_text(PAGE_ROW + 1, 0, PLACEHOLDER, Colors::NORMAL)?;
        }
    }

    render_prompt(display, nav.mode())
}

/// Redraw the `nn/mm` position field
pub fn render_header<D: TextDisplay, const N: usize>(
    display: &mut D,
    store: &MessageStore<N>,
    nav: &Navigator,
) -> Result<(), D::Error> {
    let position = nav
        .cursor()
        .message
        .and_then(|handle| store.position(handle))
        .unwrap_or(0);

    let mut text: String<16> = String::new();
    let _ = write!(text, "{}/{}", position, store.count());
    if text.len() > POSITION_WIDTH as usize {
        text.clear();
        let _ = write!(text, "{}", position);
    }

    display.blank(HEADER_ROW, 0, POSITION_WIDTH, Colors::NORMAL)?;
    display.draw_text(HEADER_ROW, 0, &text, Colors::NORMAL)
}

/// Redraw the system clock field
pub fn render_clock<D: TextDisplay>(display: &mut D, clock: Timestamp) -> Result<(), D::Error> {
    display.draw_text(HEADER_ROW, CLOCK_COL, &clock.format(), Colors::NORMAL)
}

/// Draw 4 lines of `message` starting at text line `row`
///
/// Cells past the end of the text are blank.
pub fn render_page<D: TextDisplay>(
    display: &mut D,
    message: &Message,
    row: u8,
) -> Result<(), D::Error> {
    for line in 0..PAGE_LINES {
        let start = (row as usize + line) * LINE_WIDTH;
        let mut cells = [b' '; LINE_WIDTH];
        for (offset, cell) in cells.iter_mut().enumerate() {
            if let Some(byte) = message.byte_at(start + offset) {
                *cell = if (0x20..=0x7E).contains(&byte) {
                    byte
                } else {
                    b'?'
                };
            }
        }
        let text = core::str::from_utf8(&cells).unwrap_or_default();
        display.draw_text(PAGE_ROW + line as u8, 0, text, Colors::NORMAL)?;
    }
    Ok(())
}

fn render_footer<D: TextDisplay>(
    display: &mut D,
    message: &Message,
    row: u8,
) -> Result<(), D::Error> {
    let mut stamp: String<9> = String::new();
    let _ = stamp.push('@');
    let _ = stamp.push_str(&message.time().format());
    display.draw_text(FOOTER_ROW, 0, &stamp, Colors::NORMAL)?;

    if message.part_tag() != 0 {
        let mut tag: String<4> = String::new();
        let _ = write!(tag, "+{}", message.part_tag());
        display.draw_text(FOOTER_ROW, PART_TAG_COL, &tag, Colors::NORMAL)?;
    }
    if row > 0 {
        display.draw_char(FOOTER_ROW, SCROLL_UP_COL, '^', Colors::NORMAL)?;
    }
    if row < message.max_row() {
        display.draw_char(FOOTER_ROW, SCROLL_DOWN_COL, 'v', Colors::NORMAL)?;
    }
    Ok(())
}

fn render_prompt<D: TextDisplay>(display: &mut D, mode: Mode) -> Result<(), D::Error> {
    let Mode::ConfirmDelete(choice) = mode else {
        return display.blank(PROMPT_ROW, 0, LINE_WIDTH as u8, Colors::NORMAL);
    };

    let (yes, no) = match choice {
        Choice::Yes => (Colors::HIGHLIGHT, Colors::NORMAL),
        Choice::No => (Colors::NORMAL, Colors::HIGHLIGHT),
    };
    display.draw_text(PROMPT_ROW, 0, "Delete?", Colors::NORMAL)?;
    display.draw_text(PROMPT_ROW, YES_COL, "Yes", yes)?;
    display.draw_text(PROMPT_ROW, NO_COL, "No", no)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use missive_display::Screen;

    fn message(text: &[u8]) -> Message {
        let mut m = Message::from_bytes(text).unwrap();
        m.stamp(Timestamp::new(8, 30, 5).unwrap());
        m
    }

    #[test]
    fn test_empty_store_shows_placeholder() {
        let store: MessageStore<2> = MessageStore::new();
        let nav = Navigator::new();
        let mut screen = Screen::new();
        render_all(&mut screen, &store, &nav, Timestamp::new(12, 0, 1).unwrap()).unwrap();

        assert_eq!(screen.line(0).as_str(), "0/0     12:00:01");
        assert_eq!(screen.line(2).as_str().trim_end(), PLACEHOLDER);
        assert_eq!(screen.line(6).as_str().trim(), "");
    }

    #[test]
    fn test_page_shows_message_and_its_time() {
        let mut store: MessageStore<2> = MessageStore::new();
        store.commit(message(b"hello world")).unwrap();
        let mut nav = Navigator::new();
        nav.on_message_stored(&store);

        let mut screen = Screen::new();
        render_all(&mut screen, &store, &nav, Timestamp::new(23, 59, 0).unwrap()).unwrap();
        assert_eq!(screen.line(0).as_str(), "1/1     23:59:00");
        assert_eq!(screen.line(1).as_str(), "hello world     ");
        assert_eq!(screen.line(2).as_str(), "                ");
        assert_eq!(screen.line(5).as_str(), "@08:30:05       ");
    }

    #[test]
    fn test_scrolled_page_starts_at_row_offset() {
        let text: std::vec::Vec<u8> = (0..80u8).map(|i| b'a' + i / 16).collect();
        let mut store: MessageStore<2> = MessageStore::new();
        store.commit(message(&text)).unwrap();
        let mut nav = Navigator::new();
        nav.on_message_stored(&store);
        nav.on_direction(Direction::Right, &mut store);

        let mut screen = Screen::new();
        render_all(&mut screen, &store, &nav, Timestamp::MIDNIGHT).unwrap();
        assert_eq!(screen.line(1).as_str(), "bbbbbbbbbbbbbbbb");
        assert_eq!(screen.line(4).as_str(), "eeeeeeeeeeeeeeee");
        assert_eq!(screen.char_at(5, 14), Some(b'^'));
        assert_eq!(screen.char_at(5, 15), Some(b' '));
    }

    #[test]
    fn test_part_tag_and_more_below_marker() {
        let mut store: MessageStore<2> = MessageStore::new();
        store
            .commit(message(&[b'z'; 160]).with_part_tag(2))
            .unwrap();
        let mut nav = Navigator::new();
        nav.on_message_stored(&store);

        let mut screen = Screen::new();
        render_all(&mut screen, &store, &nav, Timestamp::MIDNIGHT).unwrap();
        assert_eq!(screen.line(5).as_str(), "@08:30:05 +2   v");
    }

    #[test]
    fn test_prompt_highlights_selection() {
        let mut store: MessageStore<2> = MessageStore::new();
        store.commit(message(b"x")).unwrap();
        let mut nav = Navigator::new();
        nav.on_message_stored(&store);
        nav.on_direction(Direction::Center, &mut store);

        let mut screen = Screen::new();
        render_all(&mut screen, &store, &nav, Timestamp::MIDNIGHT).unwrap();
        assert_eq!(screen.line(6).as_str(), "Delete? Yes No  ");
        assert_eq!(screen.colors_at(6, YES_COL as usize), Some(Colors::NORMAL));
        assert_eq!(screen.colors_at(6, NO_COL as usize), Some(Colors::HIGHLIGHT));

        nav.on_direction(Direction::Up, &mut store);
        render_all(&mut screen, &store, &nav, Timestamp::MIDNIGHT).unwrap();
        assert_eq!(screen.colors_at(6, YES_COL as usize), Some(Colors::HIGHLIGHT));
    }

    #[test]
    fn test_clock_redraw_leaves_prompt() {
        let mut store: MessageStore<2> = MessageStore::new();
        store.commit(message(b"x")).unwrap();
        let mut nav = Navigator::new();
        nav.on_message_stored(&store);
        nav.on_direction(Direction::Center, &mut store);

        let mut screen = Screen::new();
        render_all(&mut screen, &store, &nav, Timestamp::MIDNIGHT).unwrap();
        render_clock(&mut screen, Timestamp::new(0, 0, 1).unwrap()).unwrap();
        assert_eq!(&screen.line(0)[8..], "00:00:01");
        assert_eq!(screen.line(6).as_str(), "Delete? Yes No  ");
    }

    #[test]
    fn test_header_redraw_clears_old_digits() {
        let mut store: MessageStore<16> = MessageStore::new();
        for _ in 0..10 {
            store.commit(message(b"m")).unwrap();
        }
        let mut nav = Navigator::new();
        nav.on_message_stored(&store);
        let mut screen = Screen::new();
        render_header(&mut screen, &store, &nav).unwrap();
        assert_eq!(&screen.line(0)[..8], "10/10   ");

        let mut nav = Navigator::new();
        let mut store: MessageStore<16> = MessageStore::new();
        store.commit(message(b"m")).unwrap();
        nav.on_message_stored(&store);
        render_header(&mut screen, &store, &nav).unwrap();
        assert_eq!(&screen.line(0)[..8], "1/1     ");
    }
}
