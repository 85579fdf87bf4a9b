//! Prompt templates for the research engine.
//!
//! The JSON shape requested in [`RESEARCH_SYSTEM_PROMPT`] is the same shape
//! [`crate::extract`] reads back. Change both together.

use crate::error::{Error, Result};
use crate::subject::Subject;

/// Bumped whenever the methodology or output contract changes.
pub const PROMPT_VERSION: u32 = 1;

/// System prompt encoding the seven-step research methodology and the
/// fenced-JSON output contract.
pub const RESEARCH_SYSTEM_PROMPT: &str = r#"You are an expert candidate researcher supporting a hiring decision. Compile an accurate, thorough research dossier on the candidate.

<methodology>
Work through these 7 steps in order.

1. Profile extraction
- Given a profile URL: search for information about that profile
- Given a name and company: search for the person and verify their identity
- Extract full name, current role, company, location and headline

2. Career history
For every past employer:
- Find out what the company does
- Find its stage (startup, public, ...), funding history and outcome (acquired, shut down, still running)
- Note the candidate's title and tenure
- Assess the trajectory: promotions, lateral moves, demotions

3. Founder check
- Search "[name] founder", "[name] cofounder", "[name] startup"
- If found: what was the company, what happened to it, how long did they run it?

4. Public presence
- "[name] github": public code?
- "[name] twitter" or "[name] X": what do they post about?
- "[name] blog" or "[name] medium": do they write?
- "[name] podcast", "[name] talk", "[name] conference": speaking?

5. Referral mapping
For every past employer:
- Who else worked there in the same period
- Which roles would make good references
- Notable people who overlapped with the candidate

6. Red flag detection
- Several short tenures (under a year)
- Unexplained employment gaps
- Shutdowns or layoffs around their departure
- Demotions or a downward trajectory
- Concerning public search results
- If nothing is found, say "No red flags detected"

7. Interview questions
Write 5-7 questions specific to this candidate:
- About short tenures or gaps you found
- About founder experience and why they left
- About specific projects or companies
- Referencing their public writing or talks
- No generic interview questions
</methodology>

<output>
When the research is complete, end your final message with exactly one fenced JSON block holding an object of this shape:

```json
{
  "name": "Full Name",
  "tldr": "At most 3 lines: who they are, the notable signal, any concerns",
  "careerTimeline": [
    {
      "years": "2022-now",
      "company": "Company Name",
      "role": "Their Title",
      "companyContext": "Company stage, funding, outcome"
    }
  ],
  "founderHistory": "Startups founded, or 'No founder history found'",
  "publicPresence": {
    "github": "Summary or 'Not found'",
    "twitter": "Summary or 'Not found'",
    "writing": "Summary or 'Not found'",
    "talks": "Summary or 'Not found'"
  },
  "referralPaths": [
    "For Company A (2020-2022): someone who worked there as [role type] in that period"
  ],
  "redFlags": [
    "Flag with context"
  ],
  "interviewQuestions": [
    "Question grounded in their history"
  ]
}
```
</output>

<rules>
- Only report what you actually find. Never invent facts
- Run several searches for every step
- Red flags are factual, not judgmental
- Interview questions are specific to THIS candidate
- If information is scarce, say "Limited information available"
- Prefer recent information (last 3-5 years)
- The final JSON must be valid
</rules>
"#;

const USER_PROMPT_HEADER: &str = "Research this candidate and compile a comprehensive dossier:";

const USER_PROMPT_FOOTER: &str =
    "follow the 7-step research methodology and output your findings as JSON.";

/// The pair of prompts handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

/// Build the system and user prompts for a subject.
pub fn build(subject: &Subject) -> Result<Prompts> {
    Ok(Prompts {
        system: RESEARCH_SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(subject)?,
    })
}

/// Build the user prompt, choosing how the engine should pin down identity.
///
/// A URL is verified directly; a name plus organization is searched jointly;
/// a bare name warns the engine about namesakes.
pub fn build_user_prompt(subject: &Subject) -> Result<String> {
    match subject {
        Subject::Url(url) if !url.trim().is_empty() => Ok(format!(
            "{USER_PROMPT_HEADER}\n\nLinkedIn URL: {url}\n\nFirst, locate and verify this profile, then {USER_PROMPT_FOOTER}"
        )),
        Subject::Name {
            name,
            organization: Some(org),
        } if !name.trim().is_empty() && !org.trim().is_empty() => Ok(format!(
            "{USER_PROMPT_HEADER}\n\nName: {name}\nCurrent Company: {org}\n\nFirst, search to find and verify this person using both their name and company, then {USER_PROMPT_FOOTER}"
        )),
        Subject::Name { name, .. } if !name.trim().is_empty() => Ok(format!(
            "{USER_PROMPT_HEADER}\n\nName: {name}\n\nFirst, search to find and identify this person (there may be multiple people with this name - pick the most likely match based on professional context), then {USER_PROMPT_FOOTER}"
        )),
        _ => Err(Error::InvalidInput(
            "a profile URL or a name is required".to_string(),
        )),
    }
}
