//! Reader for the Graphviz DOT language.
//!
//! Only the graph structure is extracted: node ids in order of appearance and edges in document
//! order. Attributes are parsed and discarded, ports are dropped from node ids.

use std::collections::HashSet;

use anyhow::anyhow;

/// Nodes and edges read from a DOT document.
#[derive(Debug, Default, PartialEq)]
pub struct DotGraph {
    pub directed: bool,
    pub strict: bool,
    pub id: Option<String>,
    /// Node ids, in order of first appearance.
    pub nodes: Vec<String>,
    /// (source, destination) pairs, in document order. Parallel edges are kept.
    pub edges: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeOp {
    Directed,
    Undirected,
}

impl EdgeOp {
    fn symbol(&self) -> &'static str {
        match self {
            EdgeOp::Directed => "->",
            EdgeOp::Undirected => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Id { text: String, quoted: bool },
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Semicolon,
    Comma,
    Colon,
    Plus,
    Edge(EdgeOp),
}

#[derive(Debug)]
struct Token {
    kind: TokenKind,
    line: usize,
    column: usize,
}

const KEYWORDS: [&str; 6] = ["strict", "graph", "digraph", "node", "edge", "subgraph"];

fn syntax_error(line: usize, column: usize, message: &str) -> anyhow::Error {
    anyhow!("DOT syntax error at line {}, column {}: {}", line, column, message)
}

/// Parse a DOT document. Only the first graph of the document is read.
pub fn parse_dot(text: &str) -> anyhow::Result<DotGraph> {
    let tokens = Lexer::new(text).tokenize()?;
    Parser::new(tokens).parse_graph()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// True if only whitespace precedes the current position on its line.
    fn at_line_start(&self) -> bool {
        self.chars[..self.pos]
            .iter()
            .rev()
            .take_while(|c| **c != '\n')
            .all(|c| c.is_whitespace())
    }

    fn tokenize(mut self) -> anyhow::Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            let (line, column) = (self.line, self.column);
            let kind = match c {
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '/' if self.peek_next() == Some('/') => {
                    self.skip_line();
                    continue;
                }
                '/' if self.peek_next() == Some('*') => {
                    self.skip_block_comment(line, column)?;
                    continue;
                }
                // Lines starting with '#' are C preprocessor output.
                '#' if self.at_line_start() => {
                    self.skip_line();
                    continue;
                }
                '-' if self.peek_next() == Some('>') => {
                    self.bump();
                    self.bump();
                    TokenKind::Edge(EdgeOp::Directed)
                }
                '-' if self.peek_next() == Some('-') => {
                    self.bump();
                    self.bump();
                    TokenKind::Edge(EdgeOp::Undirected)
                }
                '{' | '}' | '[' | ']' | '=' | ';' | ',' | ':' | '+' => {
                    self.bump();
                    match c {
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '=' => TokenKind::Equals,
                        ';' => TokenKind::Semicolon,
                        ',' => TokenKind::Comma,
                        ':' => TokenKind::Colon,
                        _ => TokenKind::Plus,
                    }
                }
                '"' => self.quoted(line, column)?,
                '<' => self.html(line, column)?,
                c if c == '-' || c == '.' || c.is_ascii_digit() => self.numeral(line, column)?,
                c if c == '_' || c.is_alphabetic() || !c.is_ascii() => self.identifier(),
                other => {
                    return Err(syntax_error(
                        line,
                        column,
                        &format!("unexpected character '{}'", other),
                    ))
                }
            };
            tokens.push(Token { kind, line, column });
        }
        Ok(tokens)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self, line: usize, column: usize) -> anyhow::Result<()> {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                None => return Err(syntax_error(line, column, "unterminated comment")),
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    fn take_while(&mut self, text: &mut String, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
    }

    fn identifier(&mut self) -> TokenKind {
        let mut text = String::new();
        self.take_while(&mut text, |c| c == '_' || c.is_alphanumeric() || !c.is_ascii());
        TokenKind::Id {
            text,
            quoted: false,
        }
    }

    /// Numerals. Trailing letters and underscores are kept in the same id, so pole labels such as
    /// `12_34_sig` are read as one node instead of being split after the digits.
    fn numeral(&mut self, line: usize, column: usize) -> anyhow::Result<TokenKind> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        self.take_while(&mut text, |c| c == '.' || c == '_' || c.is_alphanumeric());
        if text == "-" || text == "." || text == "-." {
            return Err(syntax_error(line, column, "invalid numeral"));
        }
        Ok(TokenKind::Id {
            text,
            quoted: false,
        })
    }

    fn quoted(&mut self, line: usize, column: usize) -> anyhow::Result<TokenKind> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(syntax_error(line, column, "unterminated string")),
                Some('"') => break,
                Some('\\') => match self.peek() {
                    Some('"') => {
                        self.bump();
                        text.push('"');
                    }
                    // Line continuation.
                    Some('\n') => {
                        self.bump();
                    }
                    Some('\r') if self.peek_next() == Some('\n') => {
                        self.bump();
                        self.bump();
                    }
                    _ => text.push('\\'),
                },
                Some(c) => text.push(c),
            }
        }
        Ok(TokenKind::Id { text, quoted: true })
    }

    fn html(&mut self, line: usize, column: usize) -> anyhow::Result<TokenKind> {
        self.bump();
        let mut text = String::new();
        let mut depth = 1;
        loop {
            match self.bump() {
                None => return Err(syntax_error(line, column, "unterminated HTML string")),
                Some('<') => {
                    depth += 1;
                    text.push('<');
                }
                Some('>') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    text.push('>');
                }
                Some(c) => text.push(c),
            }
        }
        Ok(TokenKind::Id { text, quoted: true })
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    graph: DotGraph,
    seen_nodes: HashSet<String>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            graph: DotGraph::default(),
            seen_nodes: HashSet::new(),
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|token| &token.kind)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn error(&self, message: &str) -> anyhow::Error {
        match self.tokens.get(self.pos) {
            Some(token) => syntax_error(token.line, token.column, message),
            None => anyhow!("DOT syntax error at end of input: {}", message),
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(
            self.peek(),
            Some(TokenKind::Id { text, quoted: false }) if text.eq_ignore_ascii_case(keyword)
        )
    }

    fn expect(&mut self, kind: TokenKind, description: &str) -> anyhow::Result<()> {
        if self.peek() != Some(&kind) {
            return Err(self.error(&format!("expected {}", description)));
        }
        self.advance();
        Ok(())
    }

    fn parse_graph(mut self) -> anyhow::Result<DotGraph> {
        if self.at_keyword("strict") {
            self.graph.strict = true;
            self.advance();
        }
        if self.at_keyword("digraph") {
            self.graph.directed = true;
        } else if !self.at_keyword("graph") {
            return Err(self.error("expected 'graph' or 'digraph'"));
        }
        self.advance();
        if matches!(self.peek(), Some(TokenKind::Id { .. })) {
            self.graph.id = Some(self.parse_id()?);
        }
        self.expect(TokenKind::LBrace, "'{'")?;
        self.parse_stmt_list()?;
        self.expect(TokenKind::RBrace, "'}'")?;
        if self.pos < self.tokens.len() {
            log::warn!("Ignoring content after the first graph of the DOT document");
        }
        Ok(self.graph)
    }

    /// Parse statements up to the closing brace. Returns the nodes mentioned in them.
    fn parse_stmt_list(&mut self) -> anyhow::Result<Vec<String>> {
        let mut nodes = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("expected '}'")),
                Some(TokenKind::RBrace) => return Ok(nodes),
                Some(TokenKind::Semicolon) => self.advance(),
                Some(_) => nodes.extend(self.parse_stmt()?),
            }
        }
    }

    fn parse_stmt(&mut self) -> anyhow::Result<Vec<String>> {
        if self.at_keyword("graph") || self.at_keyword("node") || self.at_keyword("edge") {
            self.advance();
            self.parse_attr_lists()?;
            return Ok(Vec::new());
        }
        if matches!(self.peek(), Some(TokenKind::Id { .. }))
            && self.peek_at(1) == Some(&TokenKind::Equals)
        {
            self.parse_id()?;
            self.advance();
            self.parse_id()?;
            return Ok(Vec::new());
        }

        let mut left = self.parse_operand()?;
        let mut nodes = left.clone();
        while let Some(TokenKind::Edge(op)) = self.peek() {
            let op = *op;
            let expected = if self.graph.directed {
                EdgeOp::Directed
            } else {
                EdgeOp::Undirected
            };
            if op != expected {
                return Err(self.error(&format!(
                    "edge operator '{}' is not allowed in this graph, use '{}'",
                    op.symbol(),
                    expected.symbol()
                )));
            }
            self.advance();
            let right = self.parse_operand()?;
            for source in &left {
                for destination in &right {
                    self.graph
                        .edges
                        .push((source.to_string(), destination.to_string()));
                }
            }
            nodes.extend(right.iter().cloned());
            left = right;
        }
        if self.peek() == Some(&TokenKind::LBracket) {
            self.parse_attr_lists()?;
        }
        Ok(nodes)
    }

    /// A node id or a subgraph. Returns the nodes it stands for.
    fn parse_operand(&mut self) -> anyhow::Result<Vec<String>> {
        if self.at_keyword("subgraph") || self.peek() == Some(&TokenKind::LBrace) {
            return self.parse_subgraph();
        }
        let node = self.parse_id()?;
        // Ports and compass points do not change which node is meant.
        for _ in 0..2 {
            if self.peek() != Some(&TokenKind::Colon) {
                break;
            }
            self.advance();
            self.parse_id()?;
        }
        if self.seen_nodes.insert(node.clone()) {
            self.graph.nodes.push(node.clone());
        }
        Ok(vec![node])
    }

    fn parse_subgraph(&mut self) -> anyhow::Result<Vec<String>> {
        if self.at_keyword("subgraph") {
            self.advance();
            if matches!(self.peek(), Some(TokenKind::Id { .. })) {
                self.parse_id()?;
            }
        }
        self.expect(TokenKind::LBrace, "'{'")?;
        let nodes = self.parse_stmt_list()?;
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(nodes)
    }

    fn parse_attr_lists(&mut self) -> anyhow::Result<()> {
        self.expect(TokenKind::LBracket, "'['")?;
        loop {
            match self.peek() {
                Some(TokenKind::RBracket) => {
                    self.advance();
                    if self.peek() != Some(&TokenKind::LBracket) {
                        return Ok(());
                    }
                    self.advance();
                }
                Some(TokenKind::Semicolon) | Some(TokenKind::Comma) => self.advance(),
                _ => {
                    self.parse_id()?;
                    if self.peek() == Some(&TokenKind::Equals) {
                        self.advance();
                        self.parse_id()?;
                    }
                }
            }
        }
    }

    /// An id, joining `"a" + "b"` concatenations of quoted strings.
    fn parse_id(&mut self) -> anyhow::Result<String> {
        let (mut text, quoted) = match self.peek() {
            Some(TokenKind::Id { text, quoted }) => (text.clone(), *quoted),
            _ => return Err(self.error("expected an id")),
        };
        if !quoted && KEYWORDS.iter().any(|kw| text.eq_ignore_ascii_case(kw)) {
            return Err(self.error(&format!("keyword '{}' cannot be used as an id", text)));
        }
        self.advance();
        while quoted && self.peek() == Some(&TokenKind::Plus) {
            self.advance();
            match self.peek() {
                Some(TokenKind::Id {
                    text: next,
                    quoted: true,
                }) => {
                    text.push_str(next);
                    self.advance();
                }
                _ => return Err(self.error("expected a quoted string after '+'")),
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::parse_dot;

    fn edges(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(source, destination)| (source.to_string(), destination.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_simple_digraph() {
        let graph = parse_dot("digraph G { A_sig -> B_vert; B_vert -> C }").unwrap();
        assert!(graph.directed);
        assert!(!graph.strict);
        assert_eq!(graph.id.as_deref(), Some("G"));
        assert_eq!(graph.nodes, vec!["A_sig", "B_vert", "C"]);
        assert_eq!(graph.edges, edges(&[("A_sig", "B_vert"), ("B_vert", "C")]));
    }

    #[test]
    fn test_parse_chain_and_parallel_edges() {
        let graph = parse_dot("strict digraph { a -> b -> c\n a -> b }").unwrap();
        assert!(graph.strict);
        assert_eq!(graph.id, None);
        assert_eq!(graph.edges, edges(&[("a", "b"), ("b", "c"), ("a", "b")]));
    }

    #[test]
    fn test_parse_undirected_graph() {
        let graph = parse_dot("graph { x -- y }").unwrap();
        assert!(!graph.directed);
        assert_eq!(graph.edges, edges(&[("x", "y")]));
    }

    #[test]
    fn test_parse_attributes_and_comments() {
        let text = r#"
# generated by a script
digraph poles {
    // defaults
    graph [rankdir=LR];
    node [shape=box, color="red"];
    edge [style=dashed][weight=2];
    label = "downtown";
    /* a
       block comment */
    P_1 [label="P-1"];
    P_1 -> P_2 [color=blue; penwidth=2];
}
"#;
        let graph = parse_dot(text).unwrap();
        assert_eq!(graph.nodes, vec!["P_1", "P_2"]);
        assert_eq!(graph.edges, edges(&[("P_1", "P_2")]));
    }

    #[test]
    fn test_parse_quoted_ids() {
        let text = "digraph { \"pole \\\"1\\\"\" -> \"P-\" + \"2\"; \"long\\\nname\" -> <<b>html</b>> }";
        let graph = parse_dot(text).unwrap();
        assert_eq!(
            graph.edges,
            edges(&[("pole \"1\"", "P-2"), ("longname", "<b>html</b>")])
        );
    }

    #[test]
    fn test_parse_quoted_keyword_is_an_id() {
        let graph = parse_dot("digraph { \"node\" -> \"edge\" }").unwrap();
        assert_eq!(graph.edges, edges(&[("node", "edge")]));
    }

    #[test]
    fn test_parse_numeric_labels() {
        let graph = parse_dot("digraph { 12_34_sig -> -5.5 -> 0xA }").unwrap();
        assert_eq!(graph.edges, edges(&[("12_34_sig", "-5.5"), ("-5.5", "0xA")]));
    }

    #[test]
    fn test_parse_ports_are_dropped() {
        let graph = parse_dot("digraph { a:p1:n -> b:s }").unwrap();
        assert_eq!(graph.edges, edges(&[("a", "b")]));
    }

    #[test]
    fn test_parse_subgraphs() {
        let text = "digraph { subgraph cluster_0 { a -> b } c -> { d e } ; { f } -> g }";
        let graph = parse_dot(text).unwrap();
        assert_eq!(
            graph.edges,
            edges(&[("a", "b"), ("c", "d"), ("c", "e"), ("f", "g")])
        );
        assert_eq!(graph.nodes, vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let graph = parse_dot("DiGraph { NODE [shape=box]; a -> b }").unwrap();
        assert!(graph.directed);
        assert_eq!(graph.edges, edges(&[("a", "b")]));
    }

    #[rstest]
    #[case("digraph { a -> }", "DOT syntax error at line 1, column 16: expected an id")]
    #[case("digraph { a -- b }", "DOT syntax error at line 1, column 13: edge operator '--' is not allowed in this graph, use '->'")]
    #[case("graph {\n a -> b }", "DOT syntax error at line 2, column 4: edge operator '->' is not allowed in this graph, use '--'")]
    #[case("digraph { a -> b", "DOT syntax error at end of input: expected '}'")]
    #[case("tree { a }", "DOT syntax error at line 1, column 1: expected 'graph' or 'digraph'")]
    #[case("digraph { \"a -> b }", "DOT syntax error at line 1, column 11: unterminated string")]
    #[case("digraph { a -> b ! }", "DOT syntax error at line 1, column 18: unexpected character '!'")]
    #[case("digraph { node -> b }", "DOT syntax error at line 1, column 16: expected '['")]
    fn test_parse_errors(#[case] text: &str, #[case] expected_message: &str) {
        let err = parse_dot(text).unwrap_err();
        assert_eq!(err.to_string(), expected_message);
    }
}
