//! Context filters that suppress false-positive negative matches
//!
//! Messages live in one contiguous, timestamp-ordered arena; a
//! [`ContextWindow`] is an index range into it plus the position of the
//! candidate. Filters never copy messages.

use std::fmt;
use std::ops::Range;

use regex::RegexSet;
use regex::RegexSetBuilder;

use crate::error::{AnalysisError, Result};
use crate::models::{Direction, Message};
use crate::text;

const APOLOGY: &[&str] = &[
    r"\b(i.?m |im |i am )?(really |so |truly |very )?(sorry|apologize|apologise)\b",
    r"\bmy bad\b",
    r"\bmy fault\b",
    r"\bi was wrong\b",
    r"\bi shouldn.?t have\b",
    r"\bi should have\b",
    r"\bforgive me\b",
    r"\bplease\b.*\bchance\b",
    r"\bi.?ll (do |try |be )better\b",
    r"\bi (messed|screwed|fucked) up\b",
    r"\byou.?re right\b",
    r"\byou were right\b",
];

const SELF_DIRECTED: &[&str] = &[
    r"\bi.?m\s+(a |an |such a |such an |the )?(shit|ass|idiot|stupid|terrible|worst|bad|awful|mess)\b",
    r"\bi\s+(suck|hate myself|messed up|screwed up|fucked up)\b",
    r"\bi\s+should\s+(shut up|stop|have)\b",
    r"\bmy fault\b",
    r"\bmy bad\b",
    r"\bi was wrong\b",
];

const THIRD_PARTY: &[&str] = &[
    r"\b(my |the )?(worker|boss|client|customer|employee|coworker|colleague|manager|contractor|guy|tenant)\b",
    r"\b(this |that |the )?(job|work|company|business|office|site)\b.*\b(sucks?|terrible|awful|shit|fuck|annoying|ridiculous)\b",
    r"\b(my |the )?(car|truck|phone|computer|laptop)\b.*\b(broke|dead|fucked|shit)\b",
    r"\b(traffic|weather|subway|train|bus)\b.*\b(sucks?|awful|terrible|shit|fuck)\b",
];

const DE_ESCALATION: &[&str] = &[
    r"\b(let.?s |can we |we should )(stop|calm|relax|chill|drop it|move on|not fight|not argue)\b",
    r"\b(please |just )?(calm down|stop fighting|stop arguing|stop this|enough)\b",
    r"\bcan we (just |please )?(talk|discuss) (calmly|nicely|like adults|normally)\b",
    r"\bi don.?t want to (fight|argue)\b",
    r"\blet.?s not (fight|argue|do this)\b",
    r"\bcan we (move on|move past|drop)\b",
    r"\bi.?m (trying to|not trying to)\s*(fight|argue|upset you|make you mad)\b",
    r"\bi need (a |some )?(space|break|minute|time)\b",
    r"\bplease stop\b",
    r"\blet.?s just\b.*\b(tomorrow|later|another time|sleep|rest)\b",
];

const HURT: &[&str] = &[
    r"\b(sounds like|feels like|seems like)\s+you\s+(don.?t|do not|doesn.?t)\s*(want|wanna|care|like|love|miss)",
    r"\byou\s+(don.?t|do not)\s+(want to|wanna)\s+(see|be with|talk to|hang out|spend time)",
    r"\byou\s+(don.?t|do not)\s+(want|wanna)\s+me\b",
    r"\byou\s+(don.?t|do not)\s+(miss|need|love)\s+me\b",
    r"\bi\s+(miss|love|need)\s+you\b",
    r"\bthis\s+(sucks|hurts|isn.?t fair|is hard)\b",
    r"\bi\s+(don.?t|do not)\s+know\s+what\s+to\s+(do|say)\b",
    r"\bwhat\s+(am|do)\s+i\s+supposed\s+to\b",
    r"\bi\s+(don.?t|do not)\s+want(a|\s+to)\s+(argue|fight|lose|bother|upset)\b",
    r"\bare\s+you\s+(dumping|breaking|leaving|done with)\b",
    r"\bplease\s+(don.?t|do not)\s+(dump|leave|break up|go)\b",
    r"\bi\s+hope\s+you.?(re|\s+are)\s+ok\b",
    r"\bidk\s+what\s+to\s+(say|do)\b",
];

const LAUGHTER: &[&str] = &[
    r"\b(lol|lmao|lmfao|haha+|rofl)\b|😂|🤣|😆|😹|💀",
    r"\b(jk|just kidding|joking|kidding)\b",
    r"🤪|😜|😝|🤡|😏|😈|🙃",
];

const BANTER: &[&str] = &[r"\b(lol|lmao|haha+|omg|bruh|bro|dude)\b|😂|🤣|💀|😭|😆"];

/// One of the seven suppression signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextSignal {
    /// Apology language in the message or an adjacent reply
    Apology,
    /// Negativity aimed at the speaker
    SelfDirected,
    /// Venting about work, things or outside people
    ThirdPartyVenting,
    /// Attempt to calm things down, nearby
    DeEscalation,
    /// Expressing hurt rather than attacking
    HurtExpression,
    /// Laughter or playful markers around the message
    JokeContext,
    /// Both parties laughing in the surrounding exchange
    Banter,
}

impl ContextSignal {
    /// All signals, in evaluation order
    pub const ALL: [Self; 7] = [
        Self::Apology,
        Self::SelfDirected,
        Self::ThirdPartyVenting,
        Self::DeEscalation,
        Self::HurtExpression,
        Self::JokeContext,
        Self::Banter,
    ];

    /// Metric/log label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Apology => "apology",
            Self::SelfDirected => "self_directed",
            Self::ThirdPartyVenting => "third_party_venting",
            Self::DeEscalation => "de_escalation",
            Self::HurtExpression => "hurt_expression",
            Self::JokeContext => "joke_context",
            Self::Banter => "banter",
        }
    }
}

impl fmt::Display for ContextSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate message and the bounded slice of conversation around it
#[derive(Debug, Clone, Copy)]
pub struct ContextWindow<'a> {
    arena: &'a [Message],
    center: usize,
    range: (usize, usize),
}

impl<'a> ContextWindow<'a> {
    /// Window of `radius` messages on each side of `center`, clipped to the arena.
    ///
    /// Returns `None` if `center` is out of bounds.
    #[must_use]
    pub fn around(arena: &'a [Message], center: usize, radius: usize) -> Option<Self> {
        Self::within(arena, center, 0..arena.len()).map(|w| w.narrowed(radius))
    }

    /// Window over an explicit index range of the arena.
    ///
    /// The range is clipped to the arena; `None` if `center` falls outside it.
    #[must_use]
    pub fn within(arena: &'a [Message], center: usize, range: Range<usize>) -> Option<Self> {
        let end = range.end.min(arena.len());
        let start = range.start.min(end);
        (start..end).contains(&center).then_some(Self {
            arena,
            center,
            range: (start, end),
        })
    }

    /// A window holding only the message itself
    #[must_use]
    pub fn solitary(message: &'a Message) -> Self {
        Self {
            arena: std::slice::from_ref(message),
            center: 0,
            range: (0, 1),
        }
    }

    /// The message being classified
    #[must_use]
    pub fn candidate(&self) -> &'a Message {
        &self.arena[self.center]
    }

    /// Every message in the window, candidate included
    #[must_use]
    pub fn messages(&self) -> &'a [Message] {
        &self.arena[self.range.0..self.range.1]
    }

    /// Sub-window of at most `radius` messages either side of the candidate
    #[must_use]
    pub fn narrowed(&self, radius: usize) -> Self {
        let start = self.center.saturating_sub(radius).max(self.range.0);
        let end = self
            .center
            .saturating_add(radius)
            .saturating_add(1)
            .min(self.range.1);
        Self {
            arena: self.arena,
            center: self.center,
            range: (start, end),
        }
    }

    /// Messages within `radius` of the candidate, excluding the candidate
    pub fn neighbors(&self, radius: usize) -> impl Iterator<Item = &'a Message> + 'a {
        let narrowed = self.narrowed(radius);
        let center = self.center;
        (narrowed.range.0..narrowed.range.1)
            .filter(move |&i| i != center)
            .map(move |i| &narrowed.arena[i])
    }

    /// Index of the candidate inside [`Self::messages`]
    #[must_use]
    pub const fn candidate_offset(&self) -> usize {
        self.center - self.range.0
    }
}

/// Window sizes for the context filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSettings {
    /// Neighbors checked for apology/de-escalation replies
    pub repair_radius: usize,
    /// Radius for joke detection
    pub joke_window: usize,
    /// Messages with laughter needed to call it a joke
    pub joke_threshold: usize,
    /// Radius for banter detection
    pub banter_window: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            repair_radius: 1,
            joke_window: 3,
            joke_threshold: 2,
            banter_window: 4,
        }
    }
}

/// The seven context predicates, compiled once
#[derive(Debug, Clone)]
pub struct ContextFilterBank {
    apology: RegexSet,
    self_directed: RegexSet,
    third_party: RegexSet,
    de_escalation: RegexSet,
    hurt: RegexSet,
    laughter: RegexSet,
    banter: RegexSet,
    settings: FilterSettings,
}

fn compile_set(name: &str, patterns: &[&str]) -> Result<RegexSet> {
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .map_err(|e| AnalysisError::rule(name, e.to_string()))
}

fn body_of(message: &Message) -> Option<String> {
    message
        .text_body()
        .map(|b| text::normalize(b).into_owned())
}

impl ContextFilterBank {
    /// Compile all filters with the given window sizes
    pub fn new(settings: FilterSettings) -> Result<Self> {
        Ok(Self {
            apology: compile_set("filter:apology", APOLOGY)?,
            self_directed: compile_set("filter:self_directed", SELF_DIRECTED)?,
            third_party: compile_set("filter:third_party_venting", THIRD_PARTY)?,
            de_escalation: compile_set("filter:de_escalation", DE_ESCALATION)?,
            hurt: compile_set("filter:hurt_expression", HURT)?,
            laughter: compile_set("filter:joke_context", LAUGHTER)?,
            banter: compile_set("filter:banter", BANTER)?,
            settings,
        })
    }

    /// Filters with default window sizes
    pub fn standard() -> Result<Self> {
        Self::new(FilterSettings::default())
    }

    /// Active window sizes
    #[must_use]
    pub const fn settings(&self) -> FilterSettings {
        self.settings
    }

    /// Apology language in this body alone; feeds the `is_apology` flag.
    #[must_use]
    pub fn is_apology_text(&self, body: &str) -> bool {
        self.apology.is_match(&text::normalize(body))
    }

    fn candidate_matches(set: &RegexSet, window: &ContextWindow<'_>) -> bool {
        body_of(window.candidate()).is_some_and(|b| set.is_match(&b))
    }

    fn nearby_matches(&self, set: &RegexSet, window: &ContextWindow<'_>) -> bool {
        Self::candidate_matches(set, window)
            || window
                .neighbors(self.settings.repair_radius)
                .filter_map(body_of)
                .any(|b| set.is_match(&b))
    }

    /// Apology in the candidate or an adjacent message
    #[must_use]
    pub fn apology(&self, window: &ContextWindow<'_>) -> bool {
        self.nearby_matches(&self.apology, window)
    }

    /// Candidate's negativity is aimed at the speaker
    #[must_use]
    pub fn self_directed(&self, window: &ContextWindow<'_>) -> bool {
        Self::candidate_matches(&self.self_directed, window)
    }

    /// Candidate vents about an outside person or thing
    #[must_use]
    pub fn third_party_venting(&self, window: &ContextWindow<'_>) -> bool {
        Self::candidate_matches(&self.third_party, window)
    }

    /// De-escalation in the candidate or an adjacent message
    #[must_use]
    pub fn de_escalation(&self, window: &ContextWindow<'_>) -> bool {
        self.nearby_matches(&self.de_escalation, window)
    }

    /// Candidate expresses hurt rather than hostility
    #[must_use]
    pub fn hurt_expression(&self, window: &ContextWindow<'_>) -> bool {
        Self::candidate_matches(&self.hurt, window)
    }

    /// Enough laughter/playful markers around the candidate
    #[must_use]
    pub fn joke_context(&self, window: &ContextWindow<'_>) -> bool {
        let laughing = window
            .narrowed(self.settings.joke_window)
            .messages()
            .iter()
            .filter_map(body_of)
            .filter(|b| self.laughter.is_match(b))
            .count();
        laughing >= self.settings.joke_threshold
    }

    /// Both parties laughing around the candidate.
    ///
    /// Parties are compared for equality only, so relabeling them cannot
    /// change the result.
    #[must_use]
    pub fn banter(&self, window: &ContextWindow<'_>) -> bool {
        let mut first: Option<Direction> = None;
        for message in window.narrowed(self.settings.banter_window).messages() {
            let Some(body) = body_of(message) else { continue };
            if !self.banter.is_match(&body) {
                continue;
            }
            match first {
                None => first = Some(message.direction),
                Some(party) if party != message.direction => return true,
                Some(_) => {}
            }
        }
        false
    }

    /// Evaluate one signal
    #[must_use]
    pub fn evaluate(&self, signal: ContextSignal, window: &ContextWindow<'_>) -> bool {
        match signal {
            ContextSignal::Apology => self.apology(window),
            ContextSignal::SelfDirected => self.self_directed(window),
            ContextSignal::ThirdPartyVenting => self.third_party_venting(window),
            ContextSignal::DeEscalation => self.de_escalation(window),
            ContextSignal::HurtExpression => self.hurt_expression(window),
            ContextSignal::JokeContext => self.joke_context(window),
            ContextSignal::Banter => self.banter(window),
        }
    }

    /// First signal that fires, in [`ContextSignal::ALL`] order
    #[must_use]
    pub fn first_signal(&self, window: &ContextWindow<'_>) -> Option<ContextSignal> {
        ContextSignal::ALL
            .into_iter()
            .find(|&signal| self.evaluate(signal, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convo(lines: &[(Direction, &str)]) -> Vec<Message> {
        lines
            .iter()
            .enumerate()
            .map(|(i, (d, b))| Message::text(i as i64 + 1, *d, b))
            .collect()
    }

    fn bank() -> ContextFilterBank {
        ContextFilterBank::standard().expect("Failed to compile filters")
    }

    #[test]
    fn test_window_clipping() {
        let arena = convo(&[
            (Direction::Sent, "a"),
            (Direction::Received, "b"),
            (Direction::Sent, "c"),
        ]);
        let window = ContextWindow::around(&arena, 0, 5).expect("center in range");
        assert_eq!(window.messages().len(), 3);
        assert_eq!(window.narrowed(1).messages().len(), 2);
        assert_eq!(window.neighbors(1).count(), 1);
        assert!(ContextWindow::around(&arena, 3, 1).is_none());
        assert!(ContextWindow::within(&arena, 0, 1..3).is_none());
    }

    #[test]
    fn test_apology_from_next_message() {
        let bank = bank();
        let arena = convo(&[
            (Direction::Received, "whatever"),
            (Direction::Sent, "I'm sorry, I was wrong"),
        ]);
        let window = ContextWindow::around(&arena, 0, 4).expect("center in range");
        assert!(bank.apology(&window));
        assert!(!bank.is_apology_text("whatever"));
        assert!(bank.is_apology_text("I'm sorry, I was wrong"));
    }

    #[test]
    fn test_apology_outside_repair_radius_is_ignored() {
        let bank = bank();
        let arena = convo(&[
            (Direction::Received, "whatever"),
            (Direction::Sent, "ok"),
            (Direction::Sent, "my bad"),
        ]);
        let window = ContextWindow::around(&arena, 0, 4).expect("center in range");
        assert!(!bank.apology(&window));
    }

    #[test]
    fn test_body_only_filters() {
        let bank = bank();
        let self_msg = Message::text(1, Direction::Sent, "I'm such an idiot");
        assert!(bank.self_directed(&ContextWindow::solitary(&self_msg)));

        let venting = Message::text(2, Direction::Sent, "this job is so fucking annoying");
        assert!(bank.third_party_venting(&ContextWindow::solitary(&venting)));

        let hurt = Message::text(3, Direction::Received, "sounds like you don't want to see me");
        assert!(bank.hurt_expression(&ContextWindow::solitary(&hurt)));
    }

    #[test]
    fn test_venting_names_a_single_outside_party() {
        let bank = bank();
        let boss = Message::text(1, Direction::Sent, "my boss is an idiot");
        assert!(bank.third_party_venting(&ContextWindow::solitary(&boss)));

        let partner = Message::text(2, Direction::Received, "you guys never listen");
        assert!(!bank.third_party_venting(&ContextWindow::solitary(&partner)));
    }

    #[test]
    fn test_joke_context_needs_two_laughs() {
        let bank = bank();
        let arena = convo(&[
            (Direction::Sent, "lol"),
            (Direction::Received, "shut up"),
        ]);
        let window = ContextWindow::around(&arena, 1, 3).expect("center in range");
        assert!(!bank.joke_context(&window));

        let arena = convo(&[
            (Direction::Sent, "lol"),
            (Direction::Received, "shut up 😂"),
        ]);
        let window = ContextWindow::around(&arena, 1, 3).expect("center in range");
        assert!(bank.joke_context(&window));
    }

    #[test]
    fn test_banter_requires_both_parties() {
        let bank = bank();
        let one_sided = convo(&[
            (Direction::Sent, "lol"),
            (Direction::Sent, "haha"),
            (Direction::Received, "whatever"),
        ]);
        let window = ContextWindow::around(&one_sided, 2, 4).expect("center in range");
        assert!(!bank.banter(&window));

        let mutual = convo(&[
            (Direction::Sent, "lol"),
            (Direction::Received, "bruh"),
            (Direction::Received, "whatever"),
        ]);
        let window = ContextWindow::around(&mutual, 2, 4).expect("center in range");
        assert!(bank.banter(&window));
    }

    #[test]
    fn test_first_signal_none_for_plain_message() {
        let bank = bank();
        let message = Message::text(1, Direction::Sent, "That never happened");
        assert_eq!(bank.first_signal(&ContextWindow::solitary(&message)), None);
    }
}
