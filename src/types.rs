/// Unique candidate identifier within a pool.
/// Example: `r5-q12::3` (third choice of question `r5-q12`)
pub type ItemId = String;
/// Identifier of a multiple-choice question in a bank.
/// Examples: `r5-q12`, `h30-q1`
pub type QuestionId = String;
/// Identifier for a quiz category (exam subject area).
/// Examples: `takkengyoho`, `kenri`, `horei`, `zei`
pub type CategoryId = String;
/// Identifier for a topic inside a category, keyed by the frequency table.
/// Examples: `重要事項説明`, `借地借家法`, `8種制限`
pub type TopicId = String;
/// Identifier for the source that produced candidates.
/// Examples: `past_exams`, `drill_sets`
pub type SourceId = String;
/// True/false statement text derived from a choice.
/// Example: `宅地建物取引業者は、自ら売主となる場合、手付金等の保全措置を講じなければならない。`
pub type Statement = String;
