/// Ticks to hold between finishing line 1 and starting line 2.
const LINE_PAUSE_TICKS: u32 = 8;

/// Character-by-character reveal of up to two lines, then an indefinite
/// caret blink.
///
/// One external timer drives `tick`; phases are strictly sequential, so line 2
/// never starts before line 1 is complete. Dropping the value is the teardown:
/// there is no internal timer to cancel, and swapping input strings means
/// constructing a fresh `Typewriter`, which cannot interleave with the old one.
#[derive(Debug, Clone)]
pub struct Typewriter {
    line1: String,
    line2: String,
    phase: Phase,
    caret_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Initial "start after" delay, in remaining ticks.
    Waiting(u32),
    /// Revealing line 1; the value is the revealed byte length.
    RevealFirst(usize),
    /// Hold between the lines, in remaining ticks.
    Pause(u32),
    /// Revealing line 2; the value is the revealed byte length.
    RevealSecond(usize),
    /// Both lines shown in full; caret blinks until teardown.
    Blink,
}

impl Typewriter {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>, start_delay: u32) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
            phase: Phase::Waiting(start_delay),
            caret_visible: true,
        }
    }

    /// Reduced-motion variant: skip the reveal entirely and show both lines
    /// in full from the first displayed state.
    pub fn reduced_motion(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
            phase: Phase::Blink,
            caret_visible: true,
        }
    }

    /// Advance one timer tick.
    pub fn tick(&mut self) {
        self.phase = match self.phase {
            Phase::Waiting(0) => Phase::RevealFirst(advance(&self.line1, 0)),
            Phase::Waiting(n) => Phase::Waiting(n - 1),
            Phase::RevealFirst(shown) => {
                let next = advance(&self.line1, shown);
                if next >= self.line1.len() {
                    if self.line2.is_empty() {
                        Phase::Blink
                    } else {
                        Phase::Pause(LINE_PAUSE_TICKS)
                    }
                } else {
                    Phase::RevealFirst(next)
                }
            }
            Phase::Pause(0) => Phase::RevealSecond(advance(&self.line2, 0)),
            Phase::Pause(n) => Phase::Pause(n - 1),
            Phase::RevealSecond(shown) => {
                let next = advance(&self.line2, shown);
                if next >= self.line2.len() {
                    Phase::Blink
                } else {
                    Phase::RevealSecond(next)
                }
            }
            Phase::Blink => {
                self.caret_visible = !self.caret_visible;
                Phase::Blink
            }
        };
    }

    /// The currently revealed prefixes of both lines.
    pub fn display(&self) -> (&str, &str) {
        match self.phase {
            Phase::Waiting(_) => ("", ""),
            Phase::RevealFirst(shown) => (&self.line1[..shown], ""),
            Phase::Pause(_) => (&self.line1, ""),
            Phase::RevealSecond(shown) => (&self.line1, &self.line2[..shown]),
            Phase::Blink => (&self.line1, &self.line2),
        }
    }

    /// Both lines fully revealed; only the caret still animates.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Blink
    }

    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }
}

/// Byte length after revealing one more character, clamped to the string end.
fn advance(s: &str, shown: usize) -> usize {
    s[shown..]
        .chars()
        .next()
        .map(|c| shown + c.len_utf8())
        .unwrap_or(shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the sequencer to completion, recording every displayed state.
    fn run_to_blink(tw: &mut Typewriter, max_ticks: usize) -> Vec<(String, String)> {
        let mut states = vec![{
            let (a, b) = tw.display();
            (a.to_string(), b.to_string())
        }];
        for _ in 0..max_ticks {
            if tw.is_complete() {
                break;
            }
            tw.tick();
            let (a, b) = tw.display();
            states.push((a.to_string(), b.to_string()));
        }
        states
    }

    #[test]
    fn reveals_prefix_chain_line1_before_line2() {
        let mut tw = Typewriter::new("We, face to face", "December 5th, 2026", 0);
        let states = run_to_blink(&mut tw, 200);

        assert!(tw.is_complete(), "sequencer never finished");

        let mut seen_line2 = false;
        for window in states.windows(2) {
            let (prev, next) = (&window[0], &window[1]);
            // Prefix chains only ever grow
            assert!(next.0.starts_with(prev.0.as_str()));
            assert!(next.1.starts_with(prev.1.as_str()));
            // Line 2 never begins before line 1 is complete
            if !next.1.is_empty() {
                seen_line2 = true;
                assert_eq!(next.0, "We, face to face");
            }
        }
        assert!(seen_line2);

        let last = states.last().unwrap();
        assert_eq!(last.0, "We, face to face");
        assert_eq!(last.1, "December 5th, 2026");
    }

    #[test]
    fn start_delay_holds_the_empty_state() {
        let mut tw = Typewriter::new("hello", "", 3);
        for _ in 0..3 {
            assert_eq!(tw.display(), ("", ""));
            tw.tick();
        }
        tw.tick();
        assert_eq!(tw.display(), ("h", ""));
    }

    #[test]
    fn reduced_motion_shows_full_text_immediately() {
        let tw = Typewriter::reduced_motion("line one", "line two");
        assert_eq!(tw.display(), ("line one", "line two"));
        assert!(tw.is_complete());
        assert!(tw.caret_visible());
    }

    #[test]
    fn caret_blinks_only_after_completion() {
        let mut tw = Typewriter::new("ab", "", 0);
        assert!(tw.caret_visible());
        tw.tick();
        assert!(tw.caret_visible(), "caret is steady during reveal");
        tw.tick(); // completes line 1, no line 2 -> Blink

        assert!(tw.is_complete());
        let before = tw.caret_visible();
        tw.tick();
        assert_eq!(tw.caret_visible(), !before);
        tw.tick();
        assert_eq!(tw.caret_visible(), before);
    }

    #[test]
    fn multibyte_text_reveals_on_char_boundaries() {
        let mut tw = Typewriter::new("축하해 주세요", "신랑과 신부", 0);
        let states = run_to_blink(&mut tw, 200);
        assert!(tw.is_complete());
        // Every intermediate state is valid UTF-8 by construction; check the
        // chain ends with the full lines.
        let last = states.last().unwrap();
        assert_eq!(last.0, "축하해 주세요");
        assert_eq!(last.1, "신랑과 신부");
    }

    #[test]
    fn empty_lines_go_straight_to_blink() {
        let mut tw = Typewriter::new("", "", 0);
        tw.tick();
        tw.tick();
        assert!(tw.is_complete());
        assert_eq!(tw.display(), ("", ""));
    }
}
