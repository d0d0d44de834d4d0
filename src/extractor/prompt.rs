//! Prompt construction for the extraction model call.
//!
//! The field list here is the schema contract with the parser: renaming a
//! field in this prompt requires the matching change in `parser.rs`.

/// Build the extraction instruction block with the reduced page content
/// appended after a delimiter.
pub fn build_prompt(content: &str, max_records: usize) -> String {
    format!(
        "You are extracting structured data about rural tourism properties \
         (farm stays, pousadas, lodges, agritourism experiences) from a web page.\n\
         \n\
         Identify up to {max_records} distinct properties or experiences in the \
         content below and return them as a JSON array. Each element must have \
         exactly these fields:\n\
         \n\
         {{\n\
         \x20 \"name\": \"property or experience name\",\n\
         \x20 \"description\": \"short description\",\n\
         \x20 \"location\": \"city or region\",\n\
         \x20 \"price\": \"price as written on the page, including currency or phrases like 'sob consulta'\",\n\
         \x20 \"image\": \"image URL\",\n\
         \x20 \"activities\": [\"activity\", \"activity\"],\n\
         \x20 \"amenities\": [\"amenity\", \"amenity\"],\n\
         \x20 \"hours\": \"operating hours\",\n\
         \x20 \"contact\": {{ \"phone\": \"\", \"email\": \"\", \"website\": \"\" }}\n\
         }}\n\
         \n\
         Use an empty string or empty array for anything the page does not provide. \
         Respond with the bare JSON array and nothing else: no explanation before or \
         after it.\n\
         \n\
         Page content:\n\
         ---\n\
         {content}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_every_schema_field() {
        let prompt = build_prompt("conteúdo", 5);
        for field in [
            "\"name\"",
            "\"description\"",
            "\"location\"",
            "\"price\"",
            "\"image\"",
            "\"activities\"",
            "\"amenities\"",
            "\"hours\"",
            "\"contact\"",
            "\"phone\"",
            "\"email\"",
            "\"website\"",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn appends_content_after_delimiter() {
        let prompt = build_prompt("<p>fazenda</p>", 3);
        let delim = prompt.find("---").expect("delimiter present");
        let content = prompt.find("<p>fazenda</p>").expect("content present");
        assert!(content > delim);
        assert!(prompt.contains("up to 3"));
    }

    #[test]
    fn forbids_surrounding_prose() {
        let prompt = build_prompt("x", 5);
        assert!(prompt.contains("bare JSON array"));
    }
}
