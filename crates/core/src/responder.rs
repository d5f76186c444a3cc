//! Keyword-routed canned responses for the support chat and the assistant
//! fallback.
//!
//! A [`KeywordRouter`] is an ordered list of [`Rule`]s. Each rule pairs a
//! [`Predicate`] over the lower-cased, trimmed message with a [`Reply`]. The
//! first matching rule wins; when nothing matches the router returns its
//! default reply.

use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// A test over the normalised (lower-cased, trimmed) message.
#[derive(Debug)]
pub enum Predicate {
    /// Message contains any of the given substrings.
    ContainsAny(&'static [&'static str]),
    /// Message equals one of the given strings.
    EqualsAny(&'static [&'static str]),
    /// Message starts with one of the given prefixes.
    StartsWithAny(&'static [&'static str]),
    /// Message matches the regex.
    Pattern(Regex),
    /// Every inner predicate matches.
    All(Vec<Predicate>),
    /// At least one inner predicate matches.
    Any(Vec<Predicate>),
    /// The inner predicate does not match.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Build a [`Predicate::Pattern`].
    ///
    /// Panics on an invalid pattern. Rule tables are static, so a bad pattern
    /// is a programming error caught by the unit tests.
    pub fn pattern(re: &str) -> Self {
        Predicate::Pattern(Regex::new(re).expect("valid responder regex"))
    }

    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Predicate::ContainsAny(needles) => needles.iter().any(|n| normalized.contains(n)),
            Predicate::EqualsAny(options) => options.iter().any(|o| normalized == *o),
            Predicate::StartsWithAny(prefixes) => {
                prefixes.iter().any(|p| normalized.starts_with(p))
            }
            Predicate::Pattern(re) => re.is_match(normalized),
            Predicate::All(inner) => inner.iter().all(|p| p.matches(normalized)),
            Predicate::Any(inner) => inner.iter().any(|p| p.matches(normalized)),
            Predicate::Not(inner) => !inner.matches(normalized),
        }
    }
}

/// What a rule answers with.
#[derive(Debug)]
pub enum Reply {
    Fixed(&'static str),
    /// One of a small fixed set, picked at random.
    OneOf(&'static [&'static str]),
}

impl Reply {
    fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        match self {
            Reply::Fixed(text) => text,
            Reply::OneOf(options) => options.choose(rng).copied().unwrap_or_default(),
        }
    }
}

/// A named predicate/reply pair.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    predicate: Predicate,
    reply: Reply,
}

/// The outcome of routing one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutedReply {
    /// Name of the rule that matched, `None` when the default was used.
    pub rule: Option<&'static str>,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct KeywordRouter {
    rules: Vec<Rule>,
    default_reply: &'static str,
}

impl KeywordRouter {
    pub fn new(default_reply: &'static str) -> Self {
        Self {
            rules: Vec::new(),
            default_reply,
        }
    }

    /// Append a rule. Rules are evaluated in insertion order.
    pub fn rule(mut self, name: &'static str, predicate: Predicate, reply: Reply) -> Self {
        self.rules.push(Rule {
            name,
            predicate,
            reply,
        });
        self
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Route a message using the thread-local RNG for randomised replies.
    pub fn route(&self, message: &str) -> RoutedReply {
        self.route_with(message, &mut rand::rng())
    }

    /// Route a message with a caller-supplied RNG.
    pub fn route_with<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> RoutedReply {
        let normalized = message.trim().to_lowercase();

        let routed = match self.rules.iter().find(|r| r.predicate.matches(&normalized)) {
            Some(rule) => RoutedReply {
                rule: Some(rule.name),
                text: rule.reply.render(rng).to_string(),
            },
            None => RoutedReply {
                rule: None,
                text: self.default_reply.to_string(),
            },
        };

        tracing::debug!(rule = routed.rule.unwrap_or("default"), "Keyword router matched");
        routed
    }
}

// ---------------------------------------------------------------------------
// Support agent table (live chat widget)
// ---------------------------------------------------------------------------

pub const SUPPORT_DEFAULT: &str = "Thank you for reaching out! How can I assist you today?";

pub const SUPPORT_GREETINGS: &[&str] = &[
    "Hi there! How can I help you?",
    "Hello! Welcome to CyberSim Elite support. What can I do for you?",
    "Hey! Great to have you here. What do you need help with?",
];

pub const SUPPORT_LABS: &str = "For training lab issues, please ensure you have a stable \
internet connection. You can also check our Knowledge Base for lab-specific guides. Would \
you like more information?";

pub const SUPPORT_ACCOUNT: &str = "For account and billing issues, please verify your email \
and password. If you need to reset your password, use the \"Forgot Password\" link on the \
login page. Can I help you with anything specific?";

pub const SUPPORT_TECHNICAL: &str = "We're sorry you're experiencing technical difficulties. \
Can you provide more details about the issue? This will help us assist you better.";

pub const SUPPORT_PREMIUM: &str = "Premium members get 24/7 support with priority response \
times. Would you like to learn more about upgrading to our Elite Pro plan?";

pub const SUPPORT_GOODBYES: &[&str] = &[
    "Thank you for chatting with us! Feel free to reach out anytime you need help.",
    "Is there anything else I can help you with?",
    "Great! Let me know if you need assistance with anything else.",
];

/// Display name attached to agent messages in chat sessions.
pub const SUPPORT_AGENT_NAME: &str = "Support Agent";

/// Rule table for the live support chat.
pub fn support_agent() -> KeywordRouter {
    KeywordRouter::new(SUPPORT_DEFAULT)
        .rule(
            "greeting",
            Predicate::pattern(r"hello|hi|hey|greetings"),
            Reply::OneOf(SUPPORT_GREETINGS),
        )
        .rule(
            "labs",
            Predicate::pattern(r"lab|training|exercise|challenge|simulation"),
            Reply::Fixed(SUPPORT_LABS),
        )
        .rule(
            "account",
            Predicate::pattern(r"account|billing|payment|subscription|premium|upgrade|elite pro"),
            Reply::Fixed(SUPPORT_ACCOUNT),
        )
        .rule(
            "technical",
            Predicate::pattern(r"error|problem|bug|issue|broken|not working|crash|fail"),
            Reply::Fixed(SUPPORT_TECHNICAL),
        )
        .rule(
            "goodbye",
            Predicate::pattern(r"thanks|thank you|bye|see you"),
            Reply::OneOf(SUPPORT_GOODBYES),
        )
        .rule(
            "premium",
            Predicate::pattern(r"premium|elite|pro|features|upgrade|pricing"),
            Reply::Fixed(SUPPORT_PREMIUM),
        )
}

// ---------------------------------------------------------------------------
// Assistant fallback table
// ---------------------------------------------------------------------------

pub const ASSISTANT_SQL_INJECTION: &str = "🎯 **SQL Injection Learning Path:**\n\n\
**Step 1: Read the Article**\n• Go to Intel Base → Attack Techniques\n\
• Read 'Introduction to SQL Injection'\n\n\
**Step 2: Practice in Lab**\n• Go to Training Labs → Attack Labs\n\
• Start the SQL Injection simulation\n• Follow the step-by-step guide\n\n\
**Step 3: Key Concepts**\n• Understanding database queries\n• Finding injection points\n\
• Bypassing authentication\n• Extracting data\n\n\
**Quick Start:** Open 'Training Labs', then select 'SQL Injection' under Attack Labs!\n\n\
Need help with a specific part?";

pub const ASSISTANT_LABS: &str = "🧪 **Training Labs Help:**\n\n\
We offer multiple cybersecurity labs:\n\n\
**Attack Labs:**\n• SQL Injection\n• Cross-Site Scripting (XSS)\n• Command Injection\n\
• Directory Traversal\n\n\
**Defense Labs:**\n• System Hardening\n• Network Security\n• Incident Response\n\
• Web App Testing\n\n\
To start a lab, go to **Training Labs** in the navigation menu. Need help with a specific lab?";

pub const ASSISTANT_ACCOUNT: &str = "👤 **Account Support:**\n\n\
• **Forgot Password?** Use 'Forgot Password' on the login page\n\
• **Can't Login?** Check your email and password, ensure caps lock is off\n\
• **Update Profile:** Open your profile page from the top navigation\n\
• **Delete Account:** Contact support@cybersim.com\n\n\
Need more specific help with your account?";

pub const ASSISTANT_PROGRESS: &str = "📊 **Progress Tracking:**\n\n\
Your progress is saved when you complete a lab:\n\
• View your dashboard for overall stats\n• Check individual lab completion\n\
• Track your score and rank\n\n\
Visit your **Command Center** to see the details!";

pub const ASSISTANT_TECHNICAL: &str = "🔧 **Technical Support:**\n\n\
Let me help troubleshoot:\n\n\
1. **Clear browser cache** and refresh\n\
2. **Try a different browser** (Chrome, Firefox, Edge)\n\
3. **Check your internet connection**\n\
4. **Disable browser extensions** temporarily\n\
5. **Update your browser** to the latest version\n\n\
If the issue persists, please describe the specific error and I'll provide more targeted help!";

pub const ASSISTANT_ARTICLES: &str = "📚 **Intel Base Articles:**\n\n\
Access our knowledge base:\n\n\
**Attack Techniques:**\n• SQL Injection fundamentals\n• XSS attack vectors\n\
• Command injection methods\n• Path traversal exploits\n\n\
**Defense Strategies:**\n• System hardening guides\n• Network security best practices\n\
• Incident response procedures\n\n\
Visit the **Intel Base** section to browse all articles!";

pub const ASSISTANT_GETTING_STARTED: &str = "🚀 **Getting Started with CyberSim:**\n\n\
**Step 1:** Choose your path\n• Attack Labs - Learn offensive security\n\
• Defense Labs - Master defensive techniques\n\n\
**Step 2:** Read articles in Intel Base\n• Understand concepts before practicing\n\n\
**Step 3:** Practice in Training Labs\n• Hands-on simulations\n• Step-by-step guidance\n\n\
**Step 4:** Track your progress\n• View stats in Command Center\n\n\
What topic interests you most?";

pub const ASSISTANT_CONCEPTS: &str = "🎓 **Cybersecurity Learning:**\n\n\
I can explain various cybersecurity concepts:\n\n\
• **Vulnerabilities:** SQL injection, XSS, CSRF, etc.\n\
• **Defense Techniques:** Firewalls, IDS/IPS, encryption\n\
• **Tools:** Nmap, Metasploit, Wireshark, Burp Suite\n\
• **Methodologies:** Penetration testing, incident response\n\n\
What specific topic would you like to learn about?";

pub const ASSISTANT_PRICING: &str = "💎 **Subscription Plans:**\n\n\
**Free Tier:**\n• Basic labs and articles\n• Limited progress tracking\n• Community support\n\n\
**Elite Pro:**\n• All advanced labs\n• Detailed analytics\n• Priority support\n\
• Certificates\n• Exclusive content\n\n\
Upgrade from your profile page!";

pub const ASSISTANT_GREETING: &str = "👋 Hello! I'm here to help you with anything related to \
CyberSim Elite. Whether you need help with labs, have account questions, or want to learn \
about cybersecurity, I'm ready to assist!";

pub const ASSISTANT_THANKS: &str =
    "You're welcome! 😊 Feel free to ask if you need anything else. Happy hacking!";

pub const ASSISTANT_DEFAULT: &str = "I'm here to help! I can assist with:\n\n\
🧪 **Training Labs** - Lab access and guidance\n\
👤 **Account Issues** - Login, password, profile\n\
📊 **Progress Tracking** - Stats and achievements\n\
🔧 **Technical Support** - Bugs and errors\n\
📚 **Learning Resources** - Articles and tutorials\n\
🎓 **Cybersecurity Questions** - Concepts and techniques\n\n\
What would you like help with?";

/// Rule table used when the generative service is unavailable.
///
/// The `sql` rule is first, so any message mentioning SQL gets the SQL
/// injection learning path regardless of other keywords.
pub fn assistant_fallback() -> KeywordRouter {
    KeywordRouter::new(ASSISTANT_DEFAULT)
        .rule(
            "sql_injection",
            Predicate::ContainsAny(&["sql"]),
            Reply::Fixed(ASSISTANT_SQL_INJECTION),
        )
        .rule(
            "labs",
            Predicate::ContainsAny(&["lab", "training", "simulation"]),
            Reply::Fixed(ASSISTANT_LABS),
        )
        .rule(
            "account",
            Predicate::ContainsAny(&["account", "login", "password"]),
            Reply::Fixed(ASSISTANT_ACCOUNT),
        )
        .rule(
            "progress",
            Predicate::ContainsAny(&["progress", "achievement", "score"]),
            Reply::Fixed(ASSISTANT_PROGRESS),
        )
        .rule(
            "technical",
            Predicate::ContainsAny(&["error", "bug", "not working", "broken"]),
            Reply::Fixed(ASSISTANT_TECHNICAL),
        )
        .rule(
            "articles",
            Predicate::All(vec![
                Predicate::ContainsAny(&["article", "read"]),
                Predicate::Not(Box::new(Predicate::ContainsAny(&["how to learn"]))),
            ]),
            Reply::Fixed(ASSISTANT_ARTICLES),
        )
        .rule(
            "getting_started",
            Predicate::ContainsAny(&[
                "how to learn",
                "how do i learn",
                "getting started",
                "start learning",
            ]),
            Reply::Fixed(ASSISTANT_GETTING_STARTED),
        )
        .rule(
            "concepts",
            Predicate::ContainsAny(&["what is", "explain", "how does"]),
            Reply::Fixed(ASSISTANT_CONCEPTS),
        )
        .rule(
            "pricing",
            Predicate::ContainsAny(&["price", "cost", "premium", "upgrade"]),
            Reply::Fixed(ASSISTANT_PRICING),
        )
        .rule(
            "greeting",
            Predicate::ContainsAny(&["hello", "hi ", "hey"]),
            Reply::Fixed(ASSISTANT_GREETING),
        )
        // Exact/prefix only, so "thanks but it still fails" is not a farewell.
        .rule(
            "thanks",
            Predicate::Any(vec![
                Predicate::EqualsAny(&["thank you", "thanks", "thank"]),
                Predicate::StartsWithAny(&["thank you", "thanks"]),
            ]),
            Reply::Fixed(ASSISTANT_THANKS),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    // -- assistant fallback --------------------------------------------------

    #[test]
    fn sql_wins_over_every_other_keyword() {
        let router = assistant_fallback();
        for msg in [
            "SQL",
            "how do I start the sql lab?",
            "my account login broke while reading the MySQL article",
            "Hello! thanks, what is SQLi?",
            "price of the NoSQL training",
        ] {
            let reply = router.route_with(msg, &mut rng());
            assert_eq!(reply.rule, Some("sql_injection"), "message: {msg}");
            assert_eq!(reply.text, ASSISTANT_SQL_INJECTION);
        }
    }

    #[test]
    fn sql_rule_is_first() {
        assert_eq!(assistant_fallback().rule_names()[0], "sql_injection");
    }

    #[test]
    fn labs_before_account() {
        let reply = assistant_fallback().route_with("lab login", &mut rng());
        assert_eq!(reply.rule, Some("labs"));
    }

    #[test]
    fn articles_excludes_how_to_learn() {
        let router = assistant_fallback();
        assert_eq!(
            router.route_with("where can I read articles", &mut rng()).rule,
            Some("articles")
        );
        assert_eq!(
            router.route_with("how to learn from articles", &mut rng()).rule,
            Some("getting_started")
        );
    }

    #[test]
    fn thanks_requires_prefix() {
        let router = assistant_fallback();
        assert_eq!(router.route_with("Thanks!", &mut rng()).rule, Some("thanks"));
        assert_eq!(router.route_with("thank", &mut rng()).rule, Some("thanks"));
        assert_eq!(router.route_with("ok thanks", &mut rng()).rule, None);
    }

    #[test]
    fn unmatched_message_gets_default() {
        let reply = assistant_fallback().route_with("qwerty", &mut rng());
        assert_eq!(reply.rule, None);
        assert_eq!(reply.text, ASSISTANT_DEFAULT);
    }

    // -- support agent -------------------------------------------------------

    #[test]
    fn support_greeting_is_one_of_the_set() {
        let reply = support_agent().route_with("Hey there", &mut rng());
        assert_eq!(reply.rule, Some("greeting"));
        assert!(SUPPORT_GREETINGS.contains(&reply.text.as_str()));
    }

    #[test]
    fn support_patterns_match_inside_words() {
        let router = support_agent();
        for msg in [
            "I keep getting errors",
            "my app crashed",
            "any problems?",
            "the upload failed",
        ] {
            assert_eq!(router.route_with(msg, &mut rng()).rule, Some("technical"), "{msg}");
        }
        assert_eq!(
            router.route_with("the laboratory page", &mut rng()).rule,
            Some("labs")
        );
        // Substring matching: "this" contains "hi".
        assert_eq!(
            router.route_with("this thing", &mut rng()).rule,
            Some("greeting")
        );
    }

    #[test]
    fn assistant_greeting_needs_space_after_hi() {
        let router = assistant_fallback();
        assert_eq!(router.route_with("hi there", &mut rng()).rule, Some("greeting"));
        assert_eq!(router.route_with("heyyy", &mut rng()).rule, Some("greeting"));
        assert_eq!(router.route_with("chip", &mut rng()).rule, None);
    }

    #[test]
    fn support_order_account_before_premium() {
        let router = support_agent();
        assert_eq!(
            router.route_with("upgrade to premium", &mut rng()).rule,
            Some("account")
        );
        assert_eq!(
            router.route_with("what features do you have", &mut rng()).rule,
            Some("premium")
        );
    }

    #[test]
    fn support_technical_and_goodbye() {
        let router = support_agent();
        assert_eq!(
            router.route_with("The page is broken", &mut rng()).text,
            SUPPORT_TECHNICAL
        );
        let bye = router.route_with("goodbye", &mut rng());
        assert_eq!(bye.rule, Some("goodbye"));
        assert!(SUPPORT_GOODBYES.contains(&bye.text.as_str()));
    }

    #[test]
    fn support_default() {
        assert_eq!(support_agent().route("???").text, SUPPORT_DEFAULT);
    }
}
