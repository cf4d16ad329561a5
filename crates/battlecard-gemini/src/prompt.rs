use battlecard_core::BrandContext;

/// Instructions for generating a battle card against `competitor` at `url`.
#[must_use]
pub fn profile_prompt(brand: &BrandContext, competitor: &str, url: &str) -> String {
    let BrandContext {
        name: brand_name,
        positioning,
        usp,
        audience,
        output_language,
    } = brand;

    format!(
        "Role: Senior Product Marketing Manager at {brand_name}.\n\
         Task: Write a detailed sales battle card against \"{competitor}\" ({url}).\n\
         \n\
         {brand_name} profile (your baseline):\n\
         - Positioning: {positioning}\n\
         - USP: {usp}\n\
         - Audience: {audience}\n\
         \n\
         Analyse {competitor} along these dimensions and fill the JSON schema. \
         Write all text in {output_language}.\n\
         1. Executive summary: a strategic verdict, the top 3 weaknesses of {competitor}, \
         and 3 {brand_name} advantages that address them.\n\
         2. Momentum: current market position and recent updates or strategy shifts.\n\
         3. Platform coverage: where they are strong and where integrations lack depth.\n\
         4. Red flags and win signals: buyer risks with {competitor} and prospect signals favouring {brand_name}.\n\
         5. Feature check: 3-4 categories with the competitor's claim, the reality, and the {brand_name} counter-advantage.\n\
         6. Pricing: estimated entry price and drawbacks of the pricing structure.\n\
         7. Review intelligence: consensus on review platforms, why users switch to {brand_name}, \
         review counts per platform, and 4-6 realistic critical reviews rated 1 to 3 stars.\n\
         8. Kill shots: 2-3 decisive arguments, each with a statement and a talk track.\n\
         Finally, condense everything into aiContext for a chat assistant.\n\
         Be critical but factual."
    )
}

/// System instruction for answering a salesperson's question from `context`.
#[must_use]
pub fn chat_instruction(brand: &BrandContext, context: &str) -> String {
    format!(
        "You are an experienced sales engineer at {brand}. You help sales staff win against one \
         specific competitor. Use ONLY the context below to answer. Be precise, persuasive and \
         professional, and answer in {language}.\n\
         \n\
         CONTEXT (current competitor):\n\
         {context}\n\
         \n\
         If the answer is not in the context, say so honestly and bridge to the strengths of {brand}.",
        brand = brand.name,
        language = brand.output_language,
    )
}
