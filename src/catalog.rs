//! Built-in pattern catalog
//!
//! Negative categories follow published models of abusive and destructive
//! communication (DARVO, Gottman's four horsemen, coercive control). Tiers
//! are fixed here; severe categories are exempt from context suppression.
//! Supportive categories mirror constructive conflict behaviour.

use crate::error::Result;
use crate::models::Severity::{Mild, Moderate, Severe};
use crate::rules::{CategoryDefinition, RuleSet};

const FREYD: &str = "Freyd (1997)";
const GOTTMAN: &str = "Gottman & Silver (1999)";
const STARK: &str = "Stark (2007); Duluth Model";
const STERN: &str = "Stern (2007)";
const BANCROFT: &str = "Bancroft (2002)";

/// Compile the built-in catalog.
pub fn standard_rules() -> Result<RuleSet> {
    RuleSet::compile(&standard_definitions())
}

/// All built-in definitions: negative categories first, then supportive.
#[must_use]
pub fn standard_definitions() -> Vec<CategoryDefinition> {
    let mut defs = hurtful_language();
    defs.extend(darvo());
    defs.push(gaslighting());
    defs.extend(four_horsemen());
    defs.extend(coercive_control());
    defs.extend(manipulation());
    defs.extend(supportive());
    defs
}

fn hurtful_language() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::negative("personal_attack", Severe, 9, &[
            r"\bdead\s+(sissy|sister|brother|mom|dad|mother|father|baby|child)\b",
            r"\b(at\s+least\s+)?my\s+\w+\s+isn.?t\s+dead\b",
            r"\bhelpless\s+(little\s+)?baby\b",
            r"\byou.?re\s+a\s+baby\b",
            r"\bwon.?t\s+stop\s+drinking\b",
            r"\bleave\s+you\s+in\s+the\s+hospital\b",
            r"\bnever\s+see\w*\s+you\s+again\b",
            r"\b(seizure|cancer|tumor|disease|disorder|illness)\b.*\byour\s+fault\b",
            r"\bi.?ll\s+(kill|hurt|destroy|ruin)\s+(you|your)\b",
            r"\byou.?ll\s+(regret|pay\s+for|be\s+sorry)\b",
            r"\bi\s+will\s+make\s+your\s+life\b",
            r"\bno\s+one\s+will\s+(ever\s+)?(love|want|care\s+about)\s+you\b",
            r"\byou\s+deserve\s+to\s+(suffer|be\s+alone|die|hurt)\b",
            r"\byou\s+fucked\s+up\b",
            r"\bi\s+don.?t\s+care\b.*\bbecause\b",
            r"\byou.?re\s+(worthless|nothing|garbage|trash|a\s+waste)\b",
            r"\bnobody\s+(likes|loves|wants|cares\s+about)\s+you\b",
        ])
        .about(
            "Personal Attack / Threat",
            "Threats, dehumanization, or weaponizing illness and death.",
        ),
        CategoryDefinition::negative("directed_insult", Moderate, 6, &[
            r"\byou.?re\s+(so\s+)?(stupid|dumb|pathetic|useless|worthless|selfish|lazy|immature|childish|incompetent|ignorant|delusional|disgusting)\b",
            r"\byou\s+(stupid|dumb|pathetic|useless|worthless|selfish)\b",
            r"\bfuck\s+you\b",
            r"\bf[u*][c*][k*]\s+(you|u)\b",
            r"\bscrew\s+you\b",
            r"\bgo\s+to\s+hell\b",
            r"\beat\s+shit\b",
            r"\byou.?re\s+(an?\s+)?(idiot|moron|loser|narcissist|psycho|psychopath|sociopath|liar|bitch|asshole|piece\s+of\s+shit|cunt|bastard|whore|slut)\b",
            r"\byou\s+(piece\s+of|sack\s+of)\b",
            r"\bshut\s+(the\s+fuck\s+)?up\b",
            r"\bhate\s+you\b",
            r"\bcan.?t\s+stand\s+you\b",
            r"\bsick\s+of\s+you\b",
            r"\bdisgusted\s+by\s+you\b",
            r"\bi\s+wish\s+i\s+never\s+met\s+you\b",
        ])
        .about("Directed Insult", "Insults and hostility aimed at the other person."),
        CategoryDefinition::negative("directed_profanity", Mild, 3, &[
            r"\b(fuck|fucking|fucked|shit|shitty|bullshit|damn|dammit|crap|ass|hell)\b",
            r"\bf[u*][c*][k*]\w*",
            r"\bs[h*][i*]t\w*",
        ])
        .addressed()
        .about(
            "Directed Profanity",
            "Profanity in a sentence addressed to the other person.",
        ),
        CategoryDefinition::negative("dismissive", Mild, 2, &[
            r"\bi\s+don.?t\s+care\b",
            r"\bleave\s+me\s+alone\b",
            r"\bget\s+lost\b",
            r"\bgo\s+away\b",
            r"\bwhatever\b",
            r"\bi\s+don.?t\s+have\s+time\s+for\s+this\b",
            r"\btalk\s+to\s+the\s+hand\b",
            r"\bi\s+don.?t\s+want\s+to\s+(hear|talk|discuss)\b",
        ])
        .about("Dismissive", "Brushing off the other person or the conversation."),
    ]
}

fn darvo() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::negative("deny", Moderate, 6, &[
            r"\bthat\s+never\s+happened\b",
            r"\bi\s+never\s+said\s+that\b",
            r"\bi\s+didn.?t\s+(say|do|mean)\s+that\b",
            r"\bthat.?s\s+not\s+(true|what\s+(happened|i\s+said))\b",
            r"\byou.?re\s+(making\s+that\s+up|lying|imagining)\b",
            r"\bthat\s+didn.?t\s+happen\b",
            r"\bi\s+don.?t\s+remember\s+(saying|doing)\b",
            r"\bi\s+never\s+did\s+(that|anything)\b",
            r"\bprove\s+it\b",
            r"\bwhere.?s\s+(the\s+)?(proof|evidence)\b",
            r"\byou\s+(have|got)\s+no\s+proof\b",
        ])
        .about("Denial (DARVO)", "Denying something they clearly did or said.")
        .cite(FREYD),
        CategoryDefinition::negative("attack", Moderate, 6, &[
            r"\byou\s+always\s+(ruin|mess|blame|complain|make|start|overreact|twist|lie|destroy|sabotage|cause)\w*",
            r"\byou\s+never\s+(listen|care|help|try|change|learn|understand|apologi[sz]e|admit)\w*",
            r"\byour\s+fault\b",
            r"\byou.?re\s+the\s+(one|problem|reason)\b",
            r"\bwhat\s+about\s+(when\s+)?you\b",
            r"\byou\s+can.?t\s+(even|just)\b",
            r"\blook\s+at\s+yourself\b",
            r"\byou.?re\s+no\s+better\b",
            r"\byou\s+do\s+(the\s+)?(same|it\s+too|worse)\b",
        ])
        .about("Attack (DARVO)", "Turning it around to attack the other person.")
        .cite(FREYD),
        CategoryDefinition::negative("reverse_victim", Severe, 8, &[
            r"\byou\s+(hurt|are\s+hurting)\s+me\b",
            r"\byou\s+made\s+me\s+(feel|do|cry|upset|act\s+this\s+way)\b",
            r"\bbecause\s+of\s+you\b",
            r"\byou\s+did\s+this\s+to\s+me\b",
            r"\bi.?m\s+(the\s+)?(real\s+)?victim\b",
            r"\byou\s+don.?t\s+care\s+about\s+(me|anyone|anything)\b",
            r"\byou.?re\s+(abusing|manipulating|gaslighting|bullying)\s+me\b",
            r"\byou.?re\s+the\s+(abuser|manipulator|bully|toxic\s+one)\b",
            r"\bi.?m\s+the\s+one\s+who.?s\s+(suffering|hurting|in\s+pain)\b",
            r"\blook\s+what\s+you.?ve\s+done\s+to\s+me\b",
            r"\byou\s+drove\s+me\s+to\s+(this|it|drink|cry)\b",
        ])
        .about(
            "Reverse Victim & Offender (DARVO)",
            "Casting themselves as the victim when they are the offender.",
        )
        .cite(FREYD),
    ]
}

fn gaslighting() -> CategoryDefinition {
    CategoryDefinition::negative("gaslighting", Severe, 9, &[
        r"\byou.?re\s+(imagining|making)\s+(things|that|it)\s+up\b",
        r"\byou.?re\s+remembering\s+(it\s+)?wrong\b",
        r"\bthat.?s\s+not\s+what\s+i\s+meant\b",
        r"\byou.?re\s+(crazy|insane|delusional|paranoid|losing\s+it|losing\s+your\s+mind|unhinged|unstable|mental|nuts)\b",
        r"\byou\s+(seriously\s+)?need\s+(help|therapy|medication|a\s+doctor|professional\s+help)\s+(because|you.?re|,\s+you)",
        r"\byou\s+sound\s+crazy\b",
        r"\byou.?re\s+the\s+only\s+one\s+who\s+thinks\s+that\b",
        r"\bsomething\s+is\s+(wrong|off)\s+with\s+you\b",
        r"\bare\s+you\s+sure\s+about\s+that\s*\?",
        r"\byou.?re\s+too\s+sensitive\b",
        r"\byou.?re\s+(overreacting|being\s+dramatic|being\s+emotional|blowing\s+it\s+out)\b",
        r"\bstop\s+being\s+(so\s+)?(dramatic|sensitive|emotional|crazy|hysterical)\b",
        r"\byou\s+always\s+twist\s+(things|everything|my\s+words)\b",
        r"\byou\s+took\s+it\s+(the\s+)?wrong\s+way\b",
        r"\bi\s+was\s+just\s+joking\b",
        r"\bcan.?t\s+you\s+take\s+a\s+joke\b",
        r"\bi\s+didn.?t\s+mean\s+it\s+like\s+that\b",
        r"\byou\s+can.?t\s+take\s+a\s+(joke|compliment)\b",
        r"\blighten\s+up\b",
        r"\brelax,?\s+it\s+was\s+(just\s+)?a\s+joke\b",
        r"\bno\s+one\s+(else\s+)?(thinks|would\s+think|agrees\s+with\s+you)\b",
        r"\beveryone\s+(thinks|knows|says|agrees)\s+(you.?re|you\s+are|that\s+you)\b",
        r"\bask\s+anyone\b",
        r"\bnobody\s+else\s+(has|would\s+have)\s+(a\s+)?problem\s+with\s+(this|that|it|me)\b",
        r"\ball\s+my\s+(friends|family)\s+(think|say)\s+(you.?re|that\s+you)\b",
    ])
    .about(
        "Gaslighting",
        "Making someone question their perception of reality or sanity.",
    )
    .cite(STERN)
}

fn four_horsemen() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::negative("criticism", Moderate, 5, &[
            r"\byou\s+always\s+(do|are|make|ruin|mess|forget|ignore)\b",
            r"\byou\s+never\s+(do|are|help|listen|remember|learn|try|think)\b",
            r"\bwhat.?s\s+wrong\s+with\s+you\b",
            r"\bwhat\s+kind\s+of\s+(person|man|woman)\s+(are\s+you|does\s+that)\b",
            r"\byou.?re\s+just\s+like\s+your\s+(mom|dad|mother|father|ex)\b",
            r"\byou\s+can.?t\s+do\s+anything\s+right\b",
            r"\byou.?re\s+(impossible|hopeless|incapable|incompetent)\b",
            r"\byou\s+always\s+have\s+to\s+(be\s+right|have\s+the\s+last\s+word|argue|complain|ruin)\b",
        ])
        .about(
            "Criticism (Gottman)",
            "Attacking character rather than addressing specific behavior.",
        )
        .cite(GOTTMAN),
        CategoryDefinition::negative("contempt", Moderate, 6, &[
            r"\b(duh|obviously|clearly)\b.*\byou\b",
            r"\byou.?re\s+so\s+(dumb|stupid|clueless|slow|dense|thick)\b",
            r"\bgrow\s+up\b",
            r"\bact\s+your\s+age\b",
            r"\bwhat\s+are\s+you,?\s+\d+\s*(years?\s+old)?",
            r"\bare\s+you\s+(a\s+)?(child|kid|baby|infant)\b",
            r"\bthat.?s\s+the\s+dumbest\s+thing\b",
            r"\byou\b.*\bpathetic\b",
            r"\beye\s*roll\b",
            r"\byou.?re\s+not\s+(smart|good|capable|strong|mature)\s+enough\b",
            r"\bi\s+(can.?t\s+believe|am\s+embarrassed)\s+(i.?m|to\s+be)\s+with\s+you\b",
        ])
        .about(
            "Contempt (Gottman)",
            "Treating with disrespect, mockery, superiority, or sarcasm.",
        )
        .cite(GOTTMAN),
        CategoryDefinition::negative("defensiveness", Mild, 3, &[
            r"\bit.?s\s+not\s+my\s+fault\b",
            r"\bi\s+didn.?t\s+do\s+anything\s+(wrong|bad)\b",
            r"\bwhy\s+are\s+you\s+attacking\s+me\b",
            r"\bwhat\s+did\s+i\s+do(\s+wrong)?\s*\?",
            r"\bi\s+was\s+just\s+trying\s+to\s+(help|be\s+nice)\b",
            r"\byou\s+started\s+(it|this)\b",
            r"\byou.?re\s+the\s+one\s+who\b",
            r"\bif\s+you\s+hadn.?t\s+\w+",
            r"\byeah\s+but\s+you\b",
            r"\bwell\s+you\s+also\b",
            r"\bwhat\s+about\s+when\s+you\b",
        ])
        .about(
            "Defensiveness (Gottman)",
            "Deflecting responsibility and counter-blaming.",
        )
        .cite(GOTTMAN),
        CategoryDefinition::negative("stonewalling", Mild, 3, &[
            r"\bi.?m\s+(not\s+)?(going\s+to\s+)?(talk|discuss|engage|respond|answer|listen)\s+(about|to)\s+this\b",
            r"\bthis\s+conversation\s+is\s+over\b",
            r"\bi\s+have\s+nothing\s+(more\s+)?(to\s+say|else\s+to\s+say)\b",
            r"\bi.?m\s+done\s+talking\b",
            r"\bi\s+don.?t\s+want\s+to\s+(talk|hear|discuss)\s+(about\s+)?(this|it)\b",
            r"\bdon.?t\s+talk\s+to\s+me\b",
            r"\bi.?m\s+not\s+listening\b",
            r"\btalk\s+to\s+the\s+wall\b",
        ])
        .about(
            "Stonewalling (Gottman)",
            "Withdrawing, shutting down, or refusing to engage.",
        )
        .cite(GOTTMAN),
    ]
}

fn coercive_control() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::negative("control", Severe, 8, &[
            r"\byou\s+(can.?t|shouldn.?t|better\s+not|are\s+not\s+allowed\s+to)\s+(talk|see|hang\s+out|go|visit|meet|text|call)\s+(to|with)\b",
            r"\bwho\s+(are|were)\s+you\s+(with|talking\s+to|texting|calling|seeing)\b",
            r"\b(show|let)\s+me\s+(see\s+)?your\s+(phone|messages|texts|email|social\s+media|dms)\b",
            r"\bwhy\s+(are|were)\s+you\s+talking\s+to\s+(her|him|them|that\s+person)\b",
            r"\byou\s+don.?t\s+need\s+(them|friends|anyone\s+else|to\s+go\s+out)\b",
            r"\bi.?m\s+the\s+only\s+one\s+who\s+(loves|cares|understands|knows)\s+you\b",
            r"\b(if\s+you|you\s+better)\b.*\b(or\s+else|or\s+i.?ll|or\s+we.?re\s+done)\b",
            r"\byou\s+have\s+to\s+(choose|pick)\s+(me|between)\b",
            r"\bit.?s\s+(me\s+)?or\s+(them|her|him)\b",
            r"\byou\s+spend\s+too\s+much\s+time\s+with\b",
            r"\byou\s+don.?t\s+need\s+to\s+(go|be\s+there|do\s+that|see\s+them)\b",
            r"\bi\s+need\s+to\s+know\s+where\s+you\s+are\b",
            r"\b(send|share)\s+(me\s+)?your\s+location\b",
            r"\bwho\s+was\s+that\s+on\s+the\s+phone\b",
            r"\bwhy\s+didn.?t\s+you\s+(answer|pick\s+up|respond|call\s+me\s+back)\b",
            r"\byou\s+need\s+(my\s+)?permission\b",
        ])
        .about(
            "Control & Isolation",
            "Controlling who the person sees, talks to, or where they go.",
        )
        .cite(STARK),
        CategoryDefinition::negative("financial_control", Severe, 8, &[
            r"\bi\s+pay\s+(for\s+)?everything\b",
            r"\byou\s+(can.?t|don.?t)\s+afford\b",
            r"\bmy\s+money\b",
            r"\byou\s+owe\s+me\b",
            r"\bi.?ll\s+(cut|stop)\s+(you\s+off|paying|supporting|helping)\b",
            r"\byou.?re\s+a\s+(financial\s+)?burden\b",
            r"\bwithout\s+me\s+you.?d\s+(be\s+)?(homeless|broke|on\s+the\s+street|nothing)\b",
            r"\bi\s+(gave|spent|wasted)\s+(\$|\d+|money|so\s+much)\s*\w*\s+(on\s+you|for\s+you)\b",
        ])
        .about(
            "Financial Control",
            "Using money or finances as a weapon or leverage.",
        )
        .cite(STARK),
        CategoryDefinition::negative("weaponize_family", Severe, 10, &[
            r"\b(mom|mother|dad|father|parent|family)\b.*\b(seizure|cancer|hospital|drinking|sick|ill|dying|broke|rib|dies|die|dead|condition)\b",
            r"\b(seizure|cancer|hospital|drinking|sick|dying|illness|condition)\b.*\b(mom|mother|dad|father|parent|family)\b",
            r"\bdead\s+(siss|sissy|sister|brother|sibling|baby|child|friend)\b",
            r"\bleave\s+you\s+in\s+the\s+hospital\b",
            r"\byour\s+(mom|dad|mother|father|parent)\s+(is|was)\s+(a|an)\s+\w+",
            r"\b(at\s+least\s+)?(my|i)\s+(mom|dad|mother|father|parent)\s+(isn.?t|doesn.?t|wouldn.?t|didn.?t)\b",
            r"\byou.?re\s+going\s+to\s+end\s+up\s+like\s+your\s+(mom|dad|mother|father)\b",
        ])
        .about(
            "Weaponizing Family/Health",
            "Using family illness, death, or trauma as leverage.",
        )
        .cite(BANCROFT),
    ]
}

fn manipulation() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::negative("guilt_trip", Moderate, 5, &[
            r"\bafter\s+everything\s+i.?(ve)?\s+(done|did|gave|sacrificed)\b",
            r"\bi\s+(gave|did|sacrificed)\s+(so\s+much|everything)\b",
            r"\byou.?d\s+be\s+nothing\s+without\s+me\b",
            r"\byou\s+owe\s+me\b",
            r"\bwithout\s+me\s+you\b",
            r"\bi\s+put\s+up\s+with\s+(so\s+much|everything|all\s+your)\b",
            r"\bdo\s+you\s+know\s+how\s+much\s+i.?(ve)?\s+(done|sacrificed|given\s+up)\b",
            r"\bi\s+dropped\s+everything\s+for\s+you\b",
            r"\bi\s+gave\s+up\s+\w+\s+for\s+you\b",
            r"\bi\s+stayed\s+when\s+(no\s+one\s+else|anyone\s+else)\s+would.?ve\s+(left|given\s+up)\b",
        ])
        .about("Guilt Trip", "Inducing guilt to manipulate behavior or compliance."),
        CategoryDefinition::negative("deflection", Mild, 4, &[
            r"\bthat.?s\s+not\s+the\s+point\b",
            r"\byou.?re\s+changing\s+the\s+subject\b",
            r"\bwe.?re\s+not\s+talking\s+about\b",
            r"\bstop\s+deflecting\b",
            r"\bthe\s+(real\s+)?issue\s+is\b",
            r"\bwhat\s+about\s+when\s+you\b",
            r"\bremember\s+when\s+you\b",
            r"\bbut\s+you\s+also\s+did\b",
            r"\bwell\s+what\s+about\b",
            r"\byou.?re\s+avoiding\s+the\s+(question|issue|point)\b",
        ])
        .about(
            "Deflection",
            "Changing the subject or redirecting blame when confronted.",
        ),
        CategoryDefinition::negative("ultimatum", Moderate, 7, &[
            r"\b(i.?m\s+)?(going\s+to\s+)?(leave|leaving)\s+(you|and\s+never)\b",
            r"\b(then\s+)?we.?re\s+(done|through|over|finished)\b",
            r"\bi.?m\s+(done|leaving|going\s+to\s+\w+\s+and\s+never)\b",
            r"\bnever\s+see\w*\s+you\s+again\b",
            r"\bstop\s+texting\s+me\b",
            r"\bleave\s+me\s+alone\b",
            r"\bif\s+you\s+can.?t\s+do\s+that\b.*\bleave\b",
            r"\bif\s+you\s+(don.?t|can.?t|won.?t)\b.*\bi.?m\s+(leaving|done|going|out)\b",
            r"\bthis\s+is\s+your\s+last\s+chance\b",
            r"\bi.?m\s+giving\s+you\s+(one|a)\s+(more\s+)?(chance|try|shot)\b",
            r"\byou.?re\s+going\s+to\s+lose\s+me\b",
            r"\bi\s+won.?t\s+be\s+here\s+(forever|much\s+longer|when\s+you\s+come\s+back)\b",
        ])
        .about(
            "Ultimatums & Threats",
            "Threatening to leave, end things, or impose consequences.",
        ),
        CategoryDefinition::negative("looping", Moderate, 7, &[
            r"\b(keep|going\s+to)\s+bring\w*\s+it\s+up\b",
            r"\bover\s+and\s+over(\s+and\s+over)?(\s+again)?\b",
            r"\buntil\s+you\s+(can|do|tell|admit|say|acknowledge|apologi[sz]e|confess)\b",
            r"\bi.?ll\s+keep\s+asking\b",
            r"\bwe.?re\s+not\s+done\s+(talking|discussing)\s+(about\s+)?(this|it)\b",
            r"\bi\s+won.?t\s+(stop|let\s+this\s+go|drop\s+it)\s+until\b",
            r"\banswer\s+the\s+question\b",
            r"\bjust\s+answer\s+me\b",
            r"\bwhy\s+(won.?t|can.?t)\s+you\s+just\s+(answer|tell|say|admit)\b",
        ])
        .about(
            "Looping / Interrogation",
            "Repeating the same issue until they get the desired response.",
        )
        .cite(BANCROFT),
        CategoryDefinition::negative("lying_indicator", Moderate, 5, &[
            r"\bi\s+(already|just)\s+told\s+you\b",
            r"\bi\s+never\s+said\s+(i\s+would|that|anything)\b",
            r"\bi\s+didn.?t\s+(say|do|promise|agree)\s+(that|to)\b",
            r"\bthat.?s\s+not\s+what\s+i\s+(said|meant|did)\b",
            r"\byou.?re\s+putting\s+words\s+in\s+my\s+mouth\b",
            r"\bwhy\s+(do|would)\s+i\s+(lie|make\s+that\s+up)\b",
            r"\bi\s+swear\s+i\s+didn.?t\b",
            r"\bbelieve\s+what\s+you\s+want\b",
            r"\bthink\s+whatever\s+you\s+want\b",
            r"\b(prove|show)\s+(it|me)\b",
            r"\bi\s+would\s+never\s+do\s+that\b",
        ])
        .about(
            "Lying Indicators",
            "Patterns consistent with deception, denial, or story-changing.",
        ),
        CategoryDefinition::negative("minimizing", Mild, 4, &[
            r"\bit.?s\s+not\s+(that\s+)?(big\s+of\s+a|a\s+big)\s+deal\b",
            r"\byou.?re\s+(blowing|making)\s+(this|it)\s+(out\s+of\s+proportion|into\s+a\s+big\s+deal|bigger)\b",
            r"\bit\s+wasn.?t\s+(even\s+)?(that\s+)?bad\b",
            r"\bi\s+was\s+just\s+(playing|messing|kidding)\b",
            r"\bit\s+was\s+(just\s+)?a\s+(joke|prank)\b",
            r"\bget\s+over\s+it\b",
            r"\blet\s+it\s+go\b",
            r"\bwhy\s+are\s+you\s+still\s+(upset|mad|angry|bringing\s+this\s+up)\b",
            r"\bit\s+happened\s+(so\s+long|a\s+while|days|weeks|months)\s+ago\b",
            r"\byou.?re\s+still\s+(on|about)\s+(this|that)\b",
            r"\bmove\s+on\s+already\b",
            r"\byou\s+need\s+to\s+(get\s+over|move\s+past|let\s+go\s+of)\s+(this|it|that)\b",
        ])
        .about("Minimizing", "Downplaying the other person's feelings or experiences."),
        CategoryDefinition::negative("love_bombing", Moderate, 6, &[
            r"\byou.?re\s+my\s+(everything|world|soulmate|other\s+half|reason\s+for\s+living)\b",
            r"\bi.?ve\s+never\s+(felt|loved|met)\s+(anyone|someone)\s+like\s+(you|this)\b",
            r"\bwe.?re\s+(meant|destined)\s+to\s+be\b",
            r"\bi\s+can.?t\s+live\s+without\s+you\b",
            r"\byou\s+complete\s+me\b",
            r"\bno\s+one\s+(will\s+ever|could\s+ever)\s+(love|understand|know)\s+you\s+like\s+i\s+do\b",
            r"\bwe\s+should\s+(move\s+in|get\s+married|have\s+kids)\s+already\b",
            r"\bi\s+knew\s+(from|the\s+moment)\b.*\byou\s+were\s+the\s+one\b",
        ])
        .about(
            "Love Bombing",
            "Excessive affection or attention used to overwhelm boundaries.",
        )
        .cite("Arabi (2017)"),
        CategoryDefinition::negative("future_faking", Moderate, 5, &[
            r"\b(when|once)\s+we\s+(move|get\s+married|have\s+kids|buy\s+a\s+house)\b",
            r"\bi\s+promise\s+i.?ll\s+(change|be\s+better|stop|never\s+do\s+it\s+again)\b",
            r"\bthings\s+will\s+(be\s+)?different\s+(this\s+time|from\s+now\s+on|i\s+promise)\b",
            r"\bjust\s+give\s+me\s+(one\s+more|another)\s+chance\b",
            r"\bi.?m\s+going\s+to\s+(change|be\s+better|work\s+on\s+it|go\s+to\s+therapy)\b",
            r"\bit\s+won.?t\s+happen\s+again\b",
            r"\bi\s+swear\s+on\s+my\b",
        ])
        .about(
            "Future Faking",
            "Promises about the future with no intention to follow through.",
        ),
        CategoryDefinition::negative("triangulation", Moderate, 6, &[
            r"\b(my\s+)?(ex|friend|coworker|boss|mom|dad)\s+(thinks|said|agrees)\s+(you.?re|that\s+you|i\s+should|you\s+should)\b",
            r"\beven\s+(my|your)\s+(mom|dad|friend|sister|brother)\s+(thinks|said|agrees)\b",
            r"\bat\s+least\s+(he|she|they|my\s+ex)\s+(didn.?t|would|never|always)\b",
            r"\b(he|she|they)\s+(would\s+)?never\s+(treat|do\s+this\s+to|talk\s+to)\s+me\s+like\s+(this|that|you\s+do)\b",
            r"\bmaybe\s+i\s+should\s+(go\s+back\s+to|be\s+with|call)\s+(my\s+)?ex\b",
            r"\bother\s+(guys|girls|people|men|women)\s+(would|don.?t|wouldn.?t)\b",
        ])
        .about(
            "Triangulation",
            "Introducing third parties to create jealousy or validate a position.",
        ),
        CategoryDefinition::negative("emotional_blackmail", Severe, 9, &[
            r"\bif\s+you\s+(loved|cared\s+about|really\s+loved)\s+me\b.*\byou\s+(would|wouldn.?t)\b",
            r"\bif\s+you\s+leave\s+i.?ll\s+(kill\s+myself|hurt\s+myself|die|be\s+nothing)\b",
            r"\byou.?re\s+the\s+(reason|cause)\s+i\s+(feel|am)\s+(this\s+way|depressed|anxious|suicidal)\b",
            r"\bi\s+can.?t\s+(go\s+on|survive|live)\s+without\s+you\b",
            r"\bif\s+you\s+(really\s+)?(care|love)\s+(about\s+me|me)\b.*\bprove\s+it\b",
            r"\ba\s+(real|good|loving)\s+(boyfriend|girlfriend|partner|husband|wife)\s+would\b",
        ])
        .about(
            "Emotional Blackmail",
            "Using fear, obligation, or guilt to control.",
        )
        .cite("Forward & Frazier (1997)"),
        CategoryDefinition::negative("silent_treatment", Mild, 3, &[
            r"\bi.?m\s+not\s+(going\s+to\s+)?(talk|speak|respond|answer|reply)\s+to\s+you\b",
            r"\bdon.?t\s+(bother\s+)?(calling|texting|messaging|contacting)\s+me\b",
            r"\bi\s+need\s+(time\s+away\s+from\s+you|to\s+be\s+alone)\b",
            r"\byou.?ll\s+hear\s+from\s+me\s+when\s+i.?m\s+ready\b",
            r"\bi.?m\s+going\s+(radio\s+)?silent\b",
        ])
        .about(
            "Silent Treatment Threat",
            "Weaponized withdrawal of communication as punishment.",
        ),
        CategoryDefinition::negative("double_bind", Moderate, 7, &[
            r"\b(damned|screwed)\s+if\s+you\s+do\b.*\b(damned|screwed)\s+if\s+you\s+don.?t\b",
            r"\bwhatever\s+you\s+do\s+(is\s+)?(wrong|not\s+good\s+enough|a\s+problem)\b",
            r"\bif\s+you\s+\w+\s+i.?ll\s+be\s+(mad|upset|angry|hurt)\b.*\bif\s+you\s+don.?t\b.*\bi.?ll\s+be\s+(mad|upset|angry|hurt)\b",
            r"\byou\s+can.?t\s+win\b",
            r"\bnothing\s+you\s+do\s+is\s+(ever\s+)?(right|enough|good\s+enough)\b",
        ])
        .about(
            "Double Bind",
            "Creating a lose-lose situation where every choice is punished.",
        )
        .cite("Bateson (1956)"),
        CategoryDefinition::negative("prank_test", Moderate, 5, &[
            r"\b(it\s+was|just)\s+(a\s+)?(prank|test|experiment)\b",
            r"\bi\s+was\s+(just\s+)?(testing|checking|seeing)\b",
            r"\bi\s+wanted\s+to\s+see\s+(how|if|what)\s+you\b",
            r"\byou\s+said\s+you\s+would\s+(hit|hurt|leave)\b",
            r"\byou\s+threatened\s+(to|me)\b",
        ])
        .about(
            "Prank / Testing Reactions",
            "Fabricating scenarios to test reactions or entrap.",
        ),
        CategoryDefinition::negative("selective_memory", Mild, 4, &[
            r"\bi\s+forgot\s+to\s+(mention|tell\s+you|say)\b",
            r"\boh\s+i\s+didn.?t\s+think\s+(it\s+was|that\s+was)\s+(important|relevant|a\s+big\s+deal)\b",
            r"\bi\s+only\s+(told|said|did)\s+\w+\s+because\b",
            r"\bwell\s+there.?s\s+(one\s+more|something\s+else|another)\s+thing\b",
            r"\bi\s+didn.?t\s+tell\s+you\s+(because|since)\b",
        ])
        .about(
            "Selective Memory / Trickle Truth",
            "Conveniently forgetting or revealing information incrementally.",
        ),
        CategoryDefinition::negative("catastrophizing", Mild, 3, &[
            r"\b(everything|nothing)\s+(is\s+)?(ruined|terrible|awful|wrong|broken|falling\s+apart|a\s+disaster|messed\s+up)\b",
            r"\b(always|never)\s+(goes\s+wrong|fails|works\s+out|turns\s+out\s+bad)\b",
            r"\bthe\s+world\s+is\s+(ending|against\s+me|falling\s+apart)\b",
            r"\bnothing\s+ever\s+(works|goes\s+right|changes)\b",
            r"\b(my|our)\s+life\s+is\s+(ruined|over|destroyed|a\s+disaster)\b",
            r"\bwe.?re\s+(never\s+going\s+to|doomed|finished|hopeless)\b",
        ])
        .about(
            "Catastrophizing",
            "Exaggerating situations to create urgency or panic.",
        ),
        CategoryDefinition::negative("demand_compliance", Mild, 4, &[
            r"\byou\s+(need|have)\s+to\s+(do|say|agree|apologi[sz]e|admit|accept)\s+(what|that|this)\b",
            r"\bjust\s+(do|say|agree|admit|accept)\s+(it|what\s+i)\b",
            r"\bsay\s+(you.?re\s+)?sorry\b",
            r"\badmit\s+(it|what\s+you\s+did|you\s+were\s+wrong)\b",
            r"\bagree\s+with\s+me\b",
            r"\btake\s+(it\s+)?back\b",
            r"\byou\s+will\s+(say|do|agree|admit)\s+(it|this|that)\b",
        ])
        .about(
            "Demand for Compliance",
            "Demanding agreement, apology, or submission without negotiation.",
        ),
    ]
}

fn supportive() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::supportive("validation", 8, &[
            r"\bthat\s+makes\s+(total\s+|complete\s+)?sense\b",
            r"\bi\s+(totally\s+|completely\s+)?(understand|get)\s+why\b",
            r"\byour\s+feelings\s+(are|were)\s+(valid|real|understandable)\b",
            r"\bevery\s+right\s+to\s+(feel|be)\b",
            r"\bthat.?s\s+(completely\s+|totally\s+)?(understandable|valid)\b",
            r"\bthat\s+sounds\s+(really\s+|so\s+)?(hard|tough|difficult|rough|frustrating)\b",
            r"\bi\s+hear\s+you\b",
        ])
        .about("Validation", "Acknowledging feelings and experiences as valid."),
        CategoryDefinition::supportive("empathy", 8, &[
            r"\bi\s+can\s+(only\s+)?imagine\s+how\b",
            r"\bthat\s+must\s+(be|have\s+been)\s+(really\s+|so\s+)?(hard|difficult|painful|awful|scary|tough)\b",
            r"\bsorry\s+(you.?re|you\s+are)\s+(going\s+through|dealing\s+with|feeling)\b",
            r"\bsorry\s+that\s+happened\b",
            r"\bmy\s+heart\s+goes\s+out\b",
            r"\bi\s+wish\s+i\s+could\s+(take\s+away|make\s+it\s+better|fix|help)\b",
            r"\bthat\s+sounds\s+(incredibly\s+|really\s+|so\s+)?(overwhelming|exhausting|painful|scary)\b",
        ])
        .about("Empathy", "Showing emotional understanding and compassion."),
        CategoryDefinition::supportive("appreciation", 7, &[
            r"\bi\s+(really\s+)?appreciate\s+(you|it|that|everything)\b",
            r"\bthank\s+you\s+for\s+being\b",
            r"\bgrateful\s+for\s+you\b",
            r"\byou\s+mean\s+(the\s+world|so\s+much|everything)\s+to\s+me\b",
            r"\bi\s+value\s+you\b",
            r"\byou\s+make\s+my\s+life\s+(so\s+much\s+)?better\b",
            r"\blucky\s+to\s+have\s+you\b",
            r"\bi\s+don.?t\s+take\s+you\s+for\s+granted\b",
        ])
        .about("Appreciation", "Expressing gratitude and recognizing value."),
        CategoryDefinition::supportive("encouragement", 7, &[
            r"\bi\s+believe\s+in\s+you\b",
            r"\byou\s+can\s+do\s+(this|it)\b",
            r"\bproud\s+of\s+you\b",
            r"\byou.?re\s+doing\s+(a\s+)?(great|good|amazing)\b",
            r"\byou.?ve\s+come\s+(so|this)\s+far\b",
            r"\bdon.?t\s+give\s+up\b",
            r"\bkeep\s+going\b",
            r"\byou.?re\s+stronger\s+than\s+you\s+think\b",
            r"\byou\s+inspire\s+me\b",
        ])
        .about("Encouragement", "Supporting growth and resilience."),
        CategoryDefinition::supportive("accountability", 9, &[
            r"\bi\s+was\s+wrong\b",
            r"\bi\s+take\s+(full\s+)?responsibility\b",
            r"\b(that\s+was|it.?s|it\s+was)\s+my\s+fault\b",
            r"\bi\s+shouldn.?t\s+have\b",
            r"\bi\s+owe\s+you\s+an\s+apology\b",
            r"\bi\s+need\s+to\s+do\s+better\b",
            r"\bi\s+let\s+you\s+down\b",
        ])
        .about("Accountability", "Owning mistakes without deflecting."),
        CategoryDefinition::supportive("repair_attempt", 9, &[
            r"\bcan\s+we\s+(please\s+)?start\s+over\b",
            r"\bi\s+don.?t\s+want\s+to\s+fight\b",
            r"\blet.?s\s+take\s+a\s+(breather|break|breath)\b",
            r"\bwe.?re\s+on\s+the\s+same\s+team\b",
            r"\bsorry\s+we\s+(fought|argued)\b",
            r"\bi\s+miss\s+us\b",
            r"\blet.?s\s+not\s+go\s+to\s+bed\s+angry\b",
            r"\bhow\s+can\s+i\s+make\s+(this|it)\s+(right|up\s+to\s+you)\b",
        ])
        .about("Repair Attempt", "Trying to de-escalate and reconnect during conflict.")
        .cite(GOTTMAN),
        CategoryDefinition::supportive("active_listening", 7, &[
            r"\btell\s+me\s+more\b",
            r"\bi.?m\s+listening\b",
            r"\bwhat\s+do\s+you\s+need\s+from\s+me\b",
            r"\bhow\s+are\s+you\s+feeling\b",
            r"\bi\s+want\s+to\s+understand\b",
            r"\bhelp\s+me\s+understand\b",
            r"\bso\s+what\s+you.?re\s+saying\s+is\b",
        ])
        .about("Active Listening", "Inviting the other person to be heard."),
        CategoryDefinition::supportive("emotional_support", 8, &[
            r"\bi.?m\s+(always\s+)?here\s+for\s+you\b",
            r"\byou.?re\s+not\s+alone\b",
            r"\bwe.?ll\s+get\s+through\s+this\b",
            r"\bi.?ve\s+got\s+you\b",
            r"\byou\s+can\s+(always\s+)?count\s+on\s+me\b",
            r"\bi\s+will\s+always\s+be\s+here\b",
            r"\bi.?m\s+not\s+going\s+anywhere\b",
            r"\byou\s+don.?t\s+have\s+to\s+(face|do|go\s+through)\s+this\s+alone\b",
        ])
        .about("Emotional Support", "Offering presence and comfort."),
        CategoryDefinition::supportive("affirmation", 7, &[
            r"\byou.?re\s+(an?\s+)?(amazing|wonderful|incredible|beautiful|great|good)\s+(person|partner|mom|dad|friend|human)\b",
            r"\bproud\s+to\s+be\s+with\s+you\b",
            r"\byou\s+make\s+me\s+(a\s+)?better\s+person\b",
            r"\byou\s+are\s+enough\b",
            r"\byou\s+deserve\s+(happiness|to\s+be\s+happy|love|better|good\s+things)\b",
            r"\bi\s+admire\s+(you|your)\b",
            r"\byou\s+have\s+a\s+(kind|good|beautiful|big)\s+heart\b",
        ])
        .about("Affirmation", "Affirming the other person's worth and character."),
        CategoryDefinition::supportive("compromise", 8, &[
            r"\b(find|meet)\s+(a\s+|in\s+the\s+)?middle(\s+ground)?\b",
            r"\bwhat\s+if\s+we\s+both\b",
            r"\bi.?m\s+willing\s+to\s+(compromise|meet|try|work)\b",
            r"\bwe\s+can\s+work\s+(this|it)\s+out\b",
            r"\bi\s+hear\s+your\s+point\b",
            r"\byou\s+make\s+a\s+(good|fair|valid)\s+point\b",
            r"\bi\s+respect\s+your\s+(opinion|view|perspective)\b",
        ])
        .about("Compromise", "Seeking solutions that work for both people."),
        CategoryDefinition::supportive("boundary_respect", 8, &[
            r"\btake\s+your\s+time\b",
            r"\bwhenever\s+you.?re\s+ready\b",
            r"\bno\s+pressure\b",
            r"\bi\s+respect\s+your\s+(space|boundaries|decision|privacy)\b",
            r"\bi\s+understand\s+if\s+you\s+need\b",
            r"\byou\s+don.?t\s+have\s+to\s+explain\b",
            r"\bi.?ll\s+be\s+here\s+when\s+you.?re\s+ready\b",
        ])
        .about("Boundary Respect", "Respecting the other person's space and pace."),
        CategoryDefinition::supportive("reassurance", 7, &[
            r"\bi\s+love\s+you\b",
            r"\bwe.?re\s+going\s+to\s+be\s+(ok|okay|fine|alright)\b",
            r"\bi.?m\s+not\s+going\s+anywhere\b",
            r"\bthis\s+doesn.?t\s+change\s+how\s+i\s+feel\b",
            r"\byou\s+can\s+trust\s+me\b",
            r"\bi.?ll\s+always\s+love\s+you\b",
            r"\bwe.?ll\s+get\s+through\s+this\b",
        ])
        .about("Reassurance", "Affirming commitment and security."),
        CategoryDefinition::supportive("gratitude", 6, &[
            r"\bthank\s+you\s+(so\s+much\s+)?for\b",
            r"\bthanks\s+(so\s+much\s+)?for\b",
            r"\bi\s+can.?t\s+thank\s+you\s+enough\b",
            r"\byou.?re\s+the\s+best\b",
            r"\bthat\s+means\s+(so\s+much|a\s+lot)\b",
            r"\bi\s+(really\s+)?needed\s+to\s+hear\s+that\b",
        ])
        .about("Gratitude", "Thanking the other person."),
        CategoryDefinition::supportive("vulnerability", 7, &[
            r"\bi.?m\s+(scared|afraid|worried)\s+(that|of)\b",
            r"\bi\s+need\s+you\b",
            r"\bi\s+have\s+to\s+be\s+honest\b",
            r"\bthis\s+is\s+hard\s+for\s+me\s+to\s+say\b",
            r"\bi\s+feel\s+(insecure|vulnerable|scared|afraid)\b",
            r"\bi\s+trust\s+you\s+with\b",
            r"\bcan\s+i\s+be\s+honest\b",
        ])
        .about("Vulnerability", "Sharing fears and feelings openly."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Polarity, Severity};
    use crate::rules::PROTECTED_CATEGORIES;

    fn names(rules: &RuleSet, body: &str) -> Vec<String> {
        rules
            .match_all(body)
            .iter()
            .map(|m| m.category.name().to_string())
            .collect()
    }

    #[test]
    fn test_standard_rules_compile() {
        let rules = standard_rules().expect("Failed to compile standard rules");
        assert_eq!(
            rules.categories().iter().filter(|c| c.polarity() == Polarity::Supportive).count(),
            14
        );
        for name in PROTECTED_CATEGORIES {
            let category = rules.category(name).expect("protected category missing");
            assert!(category.never_suppressed());
            assert_eq!(category.severity(), Some(Severity::Severe));
        }
    }

    #[test]
    fn test_denial_matches_only_deny() {
        let rules = standard_rules().expect("Failed to compile standard rules");
        assert_eq!(names(&rules, "That never happened"), ["deny"]);
    }

    #[test]
    fn test_sanity_attack_matches_only_gaslighting() {
        let rules = standard_rules().expect("Failed to compile standard rules");
        assert_eq!(names(&rules, "You're crazy"), ["gaslighting"]);
        assert_eq!(names(&rules, "You\u{2019}re crazy"), ["gaslighting"]);
    }

    #[test]
    fn test_supportive_examples() {
        let rules = standard_rules().expect("Failed to compile standard rules");
        let cases = [
            ("I'm here for you always", "emotional_support"),
            ("I believe in you", "encouragement"),
            ("I was wrong to say that", "accountability"),
            ("Can we start over?", "repair_attempt"),
            ("Take your time, no rush", "boundary_respect"),
            ("Let's find a middle ground", "compromise"),
            ("Thank you for everything", "gratitude"),
            ("That makes sense, I get it", "validation"),
        ];
        for (body, expected) in cases {
            assert!(
                names(&rules, body).iter().any(|n| n == expected),
                "{body:?} should match {expected}"
            );
        }
    }

    #[test]
    fn test_benign_text_matches_nothing() {
        let rules = standard_rules().expect("Failed to compile standard rules");
        for body in ["What time is dinner?", "Pick up milk on the way home", "ok", "\u{1F44D}"] {
            assert!(names(&rules, body).is_empty(), "{body:?} should be benign");
        }
    }
}
