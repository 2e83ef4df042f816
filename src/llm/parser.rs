//! Classification response parsing.
//!
//! The response is a newline list of `"<n>. <value>"` records, one per input
//! index, possibly out of order. The fallback contract is "never silently
//! drop an entry": an `unknown` value, a missing index, or an unparsable
//! line all retain the original input line.

use std::collections::HashMap;

/// Parse the numbered response against the original input lines. The output
/// always has exactly one element per input, in input order.
pub fn parse_classification_response(response: &str, user_inputs: &[String]) -> Vec<String> {
    let mut mapped: HashMap<usize, String> = HashMap::new();

    for line in response.lines() {
        let Some((number, value)) = line.split_once('.') else {
            continue;
        };
        let Ok(index) = number.trim().parse::<usize>() else {
            continue;
        };
        // 1-based on the wire.
        if index == 0 || index > user_inputs.len() {
            tracing::debug!(index, "ignoring out-of-range response line");
            continue;
        }
        mapped.insert(index - 1, value.trim().to_string());
    }

    user_inputs
        .iter()
        .enumerate()
        .map(|(i, original)| match mapped.get(&i) {
            Some(value) if !value.eq_ignore_ascii_case("unknown") => value.clone(),
            _ => original.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("input {i} | EU | kg | {i}.0")).collect()
    }

    #[test]
    fn well_formed_response_maps_in_order() {
        let user_inputs = inputs(2);
        let response = "1. toluene | RER | kilogram | 1.0\n2. acetone | RER | kilogram | 2.0";
        let parsed = parse_classification_response(response, &user_inputs);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], "toluene | RER | kilogram | 1.0");
        assert_eq!(parsed[1], "acetone | RER | kilogram | 2.0");
    }

    #[test]
    fn out_of_order_lines_are_realigned() {
        let user_inputs = inputs(3);
        let response = "3. c | GLO | unit | 1\n1. a | RER | kg | 1\n2. b | RER | kg | 1";
        let parsed = parse_classification_response(response, &user_inputs);
        assert_eq!(parsed[0], "a | RER | kg | 1");
        assert_eq!(parsed[1], "b | RER | kg | 1");
        assert_eq!(parsed[2], "c | GLO | unit | 1");
    }

    #[test]
    fn unknown_falls_back_to_original_input() {
        let user_inputs = inputs(3);
        let response = "1. mapped | RER | kg | 1\n2. UNKNOWN\n3. unknown";
        let parsed = parse_classification_response(response, &user_inputs);
        assert_eq!(parsed[1], user_inputs[1]);
        assert_eq!(parsed[2], user_inputs[2]);
    }

    #[test]
    fn missing_index_falls_back_to_original_input() {
        let user_inputs = inputs(3);
        let response = "1. mapped | RER | kg | 1";
        let parsed = parse_classification_response(response, &user_inputs);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1], user_inputs[1]);
        assert_eq!(parsed[2], user_inputs[2]);
    }

    #[test]
    fn garbage_lines_are_ignored() {
        let user_inputs = inputs(2);
        let response = "Here are the mappings:\n\n1. mapped | RER | kg | 1\nnot a record\nx. nope\n2. second | GLO | l | 2";
        let parsed = parse_classification_response(response, &user_inputs);
        assert_eq!(parsed[0], "mapped | RER | kg | 1");
        assert_eq!(parsed[1], "second | GLO | l | 2");
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let user_inputs = inputs(2);
        let response = "0. bogus\n5. also bogus\n1. valid | RER | kg | 1";
        let parsed = parse_classification_response(response, &user_inputs);
        assert_eq!(parsed[0], "valid | RER | kg | 1");
        assert_eq!(parsed[1], user_inputs[1]);
    }

    #[test]
    fn output_length_always_equals_input_length() {
        for response in ["", "complete garbage", "1. a\n1. b\n1. c", "999. x"] {
            let user_inputs = inputs(4);
            let parsed = parse_classification_response(response, &user_inputs);
            assert_eq!(parsed.len(), user_inputs.len(), "for response {response:?}");
        }
    }

    #[test]
    fn later_duplicate_index_wins() {
        let user_inputs = inputs(1);
        let response = "1. first | RER | kg | 1\n1. second | GLO | kg | 2";
        let parsed = parse_classification_response(response, &user_inputs);
        assert_eq!(parsed[0], "second | GLO | kg | 2");
    }
}
