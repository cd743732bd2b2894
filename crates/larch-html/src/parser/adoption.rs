//! The adoption agency algorithm.
//!
//! [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

use larch_dom::NodeId;

use super::core::TreeBuilder;
use super::issue::ParseIssueKind;
use super::open_elements::Scope;
use super::tags::is_special;

/// "If outer loop counter is greater than or equal to 8, then return."
const OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list."
const INNER_LOOP_LIMIT: usize = 3;

impl TreeBuilder {
    /// [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// "When the steps below require the UA to run the adoption agency
    /// algorithm for a token, the UA must perform the following steps"
    ///
    /// Returns `true` when the caller must instead act as described in the
    /// "any other end tag" entry of the "in body" insertion mode.
    pub(crate) fn run_adoption_agency(&mut self, subject: &str) -> bool {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.tree.is_html_element(current, subject)
            && !self.active_formatting.contains(current)
        {
            let _ = self.open_elements.pop();
            return false;
        }

        // STEP 3-4: "Let outer loop counter be 0. Outer loop:"
        for _ in 0..OUTER_LOOP_LIMIT {
            // STEP 7: "Let formatting element be the last element in the list
            //          of active formatting elements that: is between the end
            //          of the list and the last marker in the list, if any, or
            //          the start of the list otherwise; and has the tag name
            //          subject."
            // STEP 8: "If there is no such element, then return and instead
            //          act as described in the "any other end tag" entry above."
            let Some(formatting_element) = self
                .active_formatting
                .last_element_named(&self.tree, subject)
            else {
                return true;
            };

            // STEP 9: "If formatting element is not in the stack of open
            //          elements, then this is a parse error; remove the element
            //          from the list, and return."
            let Some(formatting_index) = self.open_elements.position(formatting_element) else {
                self.parse_error(
                    ParseIssueKind::MisnestedFormatting,
                    format!("{subject} is no longer open"),
                );
                let _ = self.remove_formatting_element(formatting_element);
                return false;
            };

            // STEP 10: "If formatting element is in the stack of open elements,
            //           but the element is not in scope, then this is a parse
            //           error; return."
            if !self
                .open_elements
                .has_node_in_scope(&self.tree, formatting_element, Scope::Default)
            {
                self.parse_error(
                    ParseIssueKind::MisnestedFormatting,
                    format!("{subject} is not in scope"),
                );
                return false;
            }

            // STEP 11: "If formatting element is not the current node, this is
            //           a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(
                    ParseIssueKind::MisnestedFormatting,
                    format!("{subject} closed across open elements"),
                );
            }

            // STEP 12: "Let furthest block be the topmost node in the stack of
            //           open elements that is lower in the stack than formatting
            //           element, and is an element in the special category. There
            //           might not be one."
            let furthest_block_index = self.furthest_block_below(formatting_index);

            // STEP 13: "If there is no furthest block, then the UA must first
            //           pop all the nodes from the bottom of the stack of open
            //           elements, from the current node up to and including
            //           formatting element, then remove formatting element from
            //           the list of active formatting elements, and finally
            //           return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.open_elements.pop_until_node(formatting_element);
                let _ = self.remove_formatting_element(formatting_element);
                return false;
            };
            let Some(furthest_block) = self.open_elements.get(furthest_block_index) else {
                return false;
            };

            // STEP 14: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            let common_ancestor = formatting_index
                .checked_sub(1)
                .and_then(|index| self.open_elements.get(index))
                .unwrap_or(NodeId::ROOT);

            // STEP 15: "Let a bookmark note the position of formatting element
            //           in the list of active formatting elements relative to
            //           the elements on either side of it in the list."
            let mut bookmark = self
                .active_formatting
                .position(formatting_element)
                .unwrap_or_default();

            // STEP 16: "Let node and last node be furthest block."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // STEP 17-18: "Let inner loop counter be 0. Inner loop:"
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 18.2: "Let node be the element immediately above node in
                //             the stack of open elements, or if node is no longer
                //             in the stack of open elements (e.g. because it got
                //             removed by this algorithm), the element that was
                //             immediately above node in the stack of open
                //             elements before node was removed."
                node_index -= 1;
                let Some(node) = self.open_elements.get(node_index) else {
                    break;
                };

                // STEP 18.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 18.4: "If inner loop counter is greater than 3 and node
                //             is in the list of active formatting elements, then
                //             remove node from the list of active formatting
                //             elements."
                if inner_loop_counter > INNER_LOOP_LIMIT
                    && let Some(removed) = self.remove_formatting_element(node)
                    && removed < bookmark
                {
                    bookmark -= 1;
                }

                // STEP 18.5: "If node is not in the list of active formatting
                //             elements, then remove node from the stack of open
                //             elements and continue."
                let Some(node_position) = self.active_formatting.position(node) else {
                    let _ = self.open_elements.remove(node);
                    continue;
                };

                // STEP 18.6: "Create an element for the token for which the
                //             element node was created, in the HTML namespace,
                //             with common ancestor as the intended parent;
                //             replace the entry for node in the list of active
                //             formatting elements with an entry for the new
                //             element, replace the entry for node in the stack of
                //             open elements with an entry for the new element, and
                //             let node be the new element."
                let replacement = self.recreate_formatting_element(node);
                self.active_formatting.set(node_position, replacement);
                self.open_elements.replace(node, replacement);

                // STEP 18.7: "If last node is furthest block, then move the
                //             aforementioned bookmark to be immediately after the
                //             new node in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_position + 1;
                }

                // STEP 18.8: "Append last node to node."
                self.tree.detach(last_node);
                self.append_node(replacement, last_node);

                // STEP 18.9: "Set last node to node."
                last_node = replacement;
            }

            // STEP 19: "Insert whatever last node ended up being in the previous
            //           step at the appropriate place for inserting a node, but
            //           using common ancestor as the override target."
            self.tree.detach(last_node);
            let point = self.appropriate_place(Some(common_ancestor));
            self.insert_at(point, last_node);

            // STEP 20: "Create an element for the token for which formatting
            //           element was created, in the HTML namespace, with
            //           furthest block as the intended parent."
            let new_element = self.recreate_formatting_element(formatting_element);

            // STEP 21: "Take all of the child nodes of furthest block and append
            //           them to the element created in the last step."
            if let Err(error) = self.tree.move_children(furthest_block, new_element) {
                log::warn!("adoption agency could not move children: {error}");
            }

            // STEP 22: "Append that new element to furthest block."
            self.append_node(furthest_block, new_element);

            // STEP 23: "Remove formatting element from the list of active
            //           formatting elements, and insert the new element into the
            //           list of active formatting elements at the position of the
            //           aforementioned bookmark."
            if let Some(removed) = self.remove_formatting_element(formatting_element)
                && removed < bookmark
            {
                bookmark -= 1;
            }
            self.active_formatting.insert_at(bookmark, new_element);

            // STEP 24: "Remove formatting element from the stack of open
            //           elements, and insert the new element into the stack of
            //           open elements immediately below the position of furthest
            //           block in that stack."
            let _ = self.open_elements.remove(formatting_element);
            self.open_elements.insert_after(furthest_block, new_element);
        }
        false
    }

    /// The first special element below `formatting_index` on the stack.
    fn furthest_block_below(&self, formatting_index: usize) -> Option<usize> {
        self.open_elements
            .iter()
            .enumerate()
            .skip(formatting_index + 1)
            .find(|&(_, &node)| {
                self.tree
                    .as_element(node)
                    .is_some_and(|element| is_special(element.namespace, &element.tag_name))
            })
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use larch_dom::NodeId;
    use larch_dom::dump::dump_document;

    use crate::parser::{HtmlParser, ParserOptions};

    fn body_dump(input: &str) -> String {
        let tree = HtmlParser::new(input, ParserOptions::new()).run();
        dump_document(&tree)
    }

    #[test]
    fn test_misnested_bold_italic() {
        let dump = body_dump("<!DOCTYPE html><p>1<b>2<i>3</b>4</i>5</p>");
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <p>
|       \"1\"
|       <b>
|         \"2\"
|         <i>
|           \"3\"
|       <i>
|         \"4\"
|       \"5\"
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn test_formatting_split_across_block() {
        let dump = body_dump("<!DOCTYPE html><b>1<p>2</b>3</p>");
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <b>
|       \"1\"
|     <p>
|       <b>
|         \"2\"
|       \"3\"
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn test_end_tag_without_formatting_element_falls_back() {
        let dump = body_dump("<!DOCTYPE html><div><span>x</b></span></div>");
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <div>
|       <span>
|         \"x\"
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn test_nested_anchor_closes_previous() {
        let dump = body_dump("<!DOCTYPE html><a href=x>1<a href=y>2");
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <a>
|       href=\"x\"
|       \"1\"
|     <a>
|       href=\"y\"
|       \"2\"
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn test_inner_loop_drops_entries_past_three() {
        let dump = body_dump("<a><b><big><em><strong><div>X</a>");
        let expected = "\
| <html>
|   <head>
|   <body>
|     <a>
|       <b>
|         <big>
|           <em>
|             <strong>
|     <big>
|       <em>
|         <strong>
|           <div>
|             <a>
|               \"X\"
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn test_inner_loop_moves_bookmark() {
        let dump = body_dump("<b>1<i>2<p>3</b>4");
        let expected = "\
| <html>
|   <head>
|   <body>
|     <b>
|       \"1\"
|       <i>
|         \"2\"
|     <i>
|       <p>
|         <b>
|           \"3\"
|         \"4\"
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn test_outer_loop_stops_after_eight_iterations() {
        let input = format!("<div><a><b>{}</a>", "<div>".repeat(10));
        let dump = body_dump(&input);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <div>
|       <a>
|         <b>
|       <b>
|         <div>
|           <a>
|           <div>
|             <a>
|             <div>
|               <a>
|               <div>
|                 <a>
|                 <div>
|                   <a>
|                   <div>
|                     <a>
|                     <div>
|                       <a>
|                       <div>
|                         <a>
|                           <div>
|                             <div>
";
        assert_eq!(dump, expected);
    }

    /// Every token in the origin map belongs to an element still listed as
    /// an active formatting element.
    fn assert_origin_matches_formatting_list(input: &str) {
        let builder = HtmlParser::new(input, ParserOptions::new()).finish();
        let mut listed: Vec<NodeId> = builder
            .active_formatting
            .iter()
            .filter_map(|entry| entry.node())
            .collect();
        let mut tracked: Vec<NodeId> = builder.origin.keys().copied().collect();
        listed.sort();
        tracked.sort();
        assert_eq!(tracked, listed, "{input}");
    }

    #[test]
    fn test_origin_follows_recreated_elements() {
        assert_origin_matches_formatting_list("<p><b>x</p>y");
        assert_origin_matches_formatting_list("<b>1<i>2<p>3</b>4");
        assert_origin_matches_formatting_list("<a><b><big><em><strong><div>X</a>");
        assert_origin_matches_formatting_list("<a>1<a>2");
        assert_origin_matches_formatting_list("<b><b><b><b>x");
        assert_origin_matches_formatting_list("<table><tr><td><b>x</td></tr></table>y");
    }
}
