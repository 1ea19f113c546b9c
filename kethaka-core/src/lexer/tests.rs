//! # Lexer 测试

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn texts(source: &str) -> Vec<String> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|t| t.text)
        .collect()
}

// -------------------------------------------------------------------------
// 基本 token
// -------------------------------------------------------------------------

#[test]
fn test_var_declaration_tokens() {
    use TokenKind::*;
    assert_eq!(
        kinds("var x = 10;"),
        vec![KeywordVar, Identifier, Assign, Number, Semicolon]
    );
    assert_eq!(texts("var x = 10;"), vec!["var", "x", "=", "10", ";"]);
}

#[test]
fn test_all_keywords() {
    use TokenKind::*;
    assert_eq!(
        kinds("var print if else for function return"),
        vec![
            KeywordVar,
            KeywordPrint,
            KeywordIf,
            KeywordElse,
            KeywordFor,
            KeywordFunction,
            KeywordReturn
        ]
    );
}

#[test]
fn test_punctuation() {
    use TokenKind::*;
    assert_eq!(
        kinds("( ) { } , ; ="),
        vec![LParen, RParen, LBrace, RBrace, Comma, Semicolon, Assign]
    );
}

#[test]
fn test_operators() {
    let tokens = tokenize("+ - * / < > <= >= == !=").unwrap();
    assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::ArithOp));
    assert!(tokens[4..].iter().all(|t| t.kind == TokenKind::CompareOp));
    assert_eq!(
        texts("<= >= == !="),
        vec!["<=", ">=", "==", "!="]
    );
}

#[test]
fn test_compare_wins_over_assign() {
    use TokenKind::*;
    assert_eq!(kinds("a==b"), vec![Identifier, CompareOp, Identifier]);
    assert_eq!(kinds("a=b"), vec![Identifier, Assign, Identifier]);
    // 有序选择：'<' 后紧跟 '=' 时作为一个整体
    assert_eq!(texts("a<=b"), vec!["a", "<=", "b"]);
}

#[test]
fn test_no_whitespace_needed() {
    assert_eq!(
        texts("print(x+1);"),
        vec!["print", "(", "x", "+", "1", ")", ";"]
    );
}

// -------------------------------------------------------------------------
// 关键字与标识符
// -------------------------------------------------------------------------

#[test]
fn test_keyword_prefix_of_identifier_is_identifier() {
    use TokenKind::*;
    assert_eq!(kinds("printer"), vec![Identifier]);
    assert_eq!(kinds("iffy variable format"), vec![Identifier; 3]);
    assert_eq!(kinds("if_"), vec![Identifier]);
    assert_eq!(kinds("var1"), vec![Identifier]);
}

#[test]
fn test_keyword_followed_by_punctuation() {
    use TokenKind::*;
    assert_eq!(kinds("if(x)"), vec![KeywordIf, LParen, Identifier, RParen]);
    assert_eq!(kinds("return;"), vec![KeywordReturn, Semicolon]);
}

#[test]
fn test_number_then_identifier() {
    use TokenKind::*;
    assert_eq!(kinds("12abc"), vec![Number, Identifier]);
    assert_eq!(texts("12abc"), vec!["12", "abc"]);
}

#[test]
fn test_multi_script_identifiers() {
    let tokens = tokenize("var имя = 1; var අංකය = 2; var _tmp = 3;").unwrap();
    let idents: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Identifier)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(idents, vec!["имя", "අංකය", "_tmp"]);
}

#[test]
fn test_sinhala_lexicon() {
    let lexicon = Lexicon::sinhala();
    let source = format!(
        "{} x = 10; {} (x > 5) {{ {}('ok'); }}",
        lexicon.var, lexicon.if_, lexicon.print
    );
    let tokens = tokenize_with(&source, &lexicon).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::KeywordVar);
    assert_eq!(tokens[5].kind, TokenKind::KeywordIf);
    assert_eq!(tokens[12].kind, TokenKind::KeywordPrint);
    assert_eq!(tokens.len(), 18);

    // 英文关键字在僧伽罗语词表下只是普通标识符
    let tokens = tokenize_with("var", &lexicon).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
}

// -------------------------------------------------------------------------
// 字符串
// -------------------------------------------------------------------------

#[test]
fn test_string_literals() {
    let tokens = tokenize(r#"print("hello world"); print('x');"#).unwrap();
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].text, "\"hello world\"");
    assert_eq!(tokens[7].text, "'x'");
}

#[test]
fn test_string_may_close_with_other_quote() {
    let tokens = tokenize(r#""abc'"#).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
}

#[test]
fn test_string_with_comment_marker() {
    let tokens = tokenize(r##"print("# not a comment");"##).unwrap();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[2].text, "\"# not a comment\"");
}

#[test]
fn test_unterminated_string_is_lex_error() {
    let err = tokenize("print(\"abc);").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedCharacter {
            line: 1,
            column: 7,
            character: '"',
        }
    );
}

#[test]
fn test_newline_inside_string_advances_line() {
    let tokens = tokenize("print(\"a\nb\");\nx").unwrap();
    assert_eq!(tokens[2].line, 1);
    assert_eq!(tokens[3].line, 2);
    assert_eq!(tokens.last().unwrap().line, 3);
}

// -------------------------------------------------------------------------
// 空白、注释、行号
// -------------------------------------------------------------------------

#[test]
fn test_comments_and_whitespace_are_discarded() {
    let source = "# header comment\nvar x = 1; # trailing\n\t\r\n";
    assert_eq!(texts(source), vec!["var", "x", "=", "1", ";"]);
}

#[test]
fn test_line_numbers() {
    let tokens = tokenize("var a = 1;\n\n# c\nprint(a);").unwrap();
    assert!(tokens[..5].iter().all(|t| t.line == 1));
    assert!(tokens[5..].iter().all(|t| t.line == 4));
}

#[test]
fn test_empty_source() {
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize("  \n # only comment").unwrap().is_empty());
}

// -------------------------------------------------------------------------
// 错误
// -------------------------------------------------------------------------

#[test]
fn test_unexpected_character() {
    let err = tokenize("var x = 1;\nvar y = x @ 2;").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedCharacter {
            line: 2,
            column: 11,
            character: '@',
        }
    );
    assert_eq!(err.line(), 2);
}

#[test]
fn test_lone_bang_is_error() {
    assert!(matches!(
        tokenize("a ! b"),
        Err(LexError::UnexpectedCharacter { character: '!', .. })
    ));
}

#[test]
fn test_integer_out_of_range() {
    assert!(tokenize("9223372036854775807").is_ok());
    let err = tokenize("\n9223372036854775808").unwrap_err();
    assert_eq!(
        err,
        LexError::IntegerOutOfRange {
            line: 2,
            text: "9223372036854775808".to_string(),
        }
    );
}

// -------------------------------------------------------------------------
// 描述
// -------------------------------------------------------------------------

#[test]
fn test_token_describe() {
    assert_eq!(Token::new(TokenKind::Semicolon, ";", 1).describe(), "';'");
    assert_eq!(
        Token::new(TokenKind::Identifier, "foo", 1).describe(),
        "标识符 'foo'"
    );
    assert_eq!(TokenKind::RParen.to_string(), "')'");
}

#[test]
fn test_identifier_classes() {
    assert!(is_ident_start('_'));
    assert!(is_ident_start('ж'));
    assert!(!is_ident_start('1'));
    assert!(is_ident_continue('1'));
    assert!(is_ident_continue('\u{200D}'));
    assert!(!is_ident_continue('-'));
}

#[test]
fn test_empty_keyword_never_matches() {
    let lexicon = Lexicon {
        var: String::new(),
        ..Lexicon::default()
    };
    let tokens = tokenize_with("x = 1", &lexicon).unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
}
