//! Fixed phrase pools the synthesizer draws from.

pub const SUBJECT_STARTS: &[&str] = &[
    "Meeting",
    "Update",
    "Reminder",
    "Invitation",
    "Report",
    "Request",
    "Follow-up",
    "Proposal",
    "Notes",
    "Action",
    "Status",
    "Summary",
    "Question",
    "Schedule",
    "Confirmation",
];

pub const SUBJECT_CONNECTORS: &[&str] = &["about", "for", "regarding", "on", "due", "about the"];

pub const SUBJECT_OBJECTS: &[&str] = &[
    "project timeline",
    "next steps",
    "your feedback",
    "the budget",
    "team assignments",
    "the deadline",
    "deliverables",
    "the quarterly plan",
    "the report",
    "invoice",
];

pub const SPAM_SUBJECT_OPENERS: &[&str] = &[
    "Act now",
    "Limited offer",
    "You won",
    "Special Promotion",
    "Claim your prize",
    "Exclusive deal",
];

pub const SPAM_SUBJECT_TAILS: &[&str] = &[
    "today",
    "— limited time",
    "for you",
    "now",
    "while supplies last",
];

pub const HIGH_PRIORITY_SUBJECTS: &[&str] = &[
    "Urgent: action required",
    "Immediate attention needed",
    "Deadline is approaching",
    "Payment is overdue",
    "Escalation: response needed",
    "Critical update required",
];

pub const NORMAL_SENTENCES: &[&str] = &[
    "I wanted to share a brief update on the current status.",
    "Please find the attached notes from our last call.",
    "Let me know if you have any questions about the plan.",
    "I will follow up with the team later this week.",
    "We completed the first phase and are moving forward.",
    "The document includes suggested changes and next steps.",
    "Thanks for your input on this matter.",
    "I scheduled a short meeting to review progress.",
    "This is a quick heads-up on the timeline change.",
];

pub const SPAM_SENTENCES: &[&str] = &[
    "Congratulations! You have been selected to claim your prize.",
    "Limited time offer — act now to receive an exclusive discount.",
    "Click the link below to verify your account and unlock rewards.",
    "Earn money from home with this simple trick.",
    "This is not a scam — instant approval with no credit check.",
    "You are pre-approved for a special loan offer today.",
    "Lowest prices guaranteed — buy now before stock runs out.",
    "Claim your free gift card by entering your details.",
];

pub const PHISHING_SENTENCES: &[&str] = &[
    "Your account will be locked unless you confirm your credentials.",
    "Please provide your login details to avoid service interruption.",
    "Verify your payment information immediately to prevent suspension.",
    "We noticed unusual activity — reset your password now.",
];

pub const HIGH_PRIORITY_SENTENCES: &[&str] = &[
    "This requires your immediate attention and a response today.",
    "Deadline is tomorrow and the deliverable must be signed off.",
    "Escalate this to management if you cannot resolve it by end of day.",
    "Payment is overdue — please process the invoice immediately.",
    "This task impacts the launch date and cannot be delayed.",
    "We need the final figures to complete the audit by Friday.",
    "Please prioritize this action and confirm once done.",
];
