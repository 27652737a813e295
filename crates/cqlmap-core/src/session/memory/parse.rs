//! Recognizer for the fixed statement shapes repositories generate.
//!
//! This is not a query-language parser: anything outside the five shapes is
//! rejected as an execution error, the way a real store would reject it.

use crate::{codec::ColumnType, ident::DELIMITER, session::StoreError};

///
/// TableRef
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TableRef {
    pub(crate) keyspace: Option<String>,
    pub(crate) table: String,
}

///
/// Statement
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Statement {
    CreateTable {
        target: TableRef,
        columns: Vec<(String, ColumnType)>,
        partition_key: Vec<String>,
    },
    Insert {
        target: TableRef,
        columns: Vec<String>,
    },
    Select {
        target: TableRef,
        columns: Vec<String>,
        filter: Vec<String>,
    },
    Delete {
        target: TableRef,
        filter: Vec<String>,
    },
}

impl Statement {
    /// Number of bind markers the statement expects.
    pub(crate) fn bind_count(&self) -> usize {
        match self {
            Self::CreateTable { .. } => 0,
            Self::Insert { columns, .. } => columns.len(),
            Self::Select { filter, .. } | Self::Delete { filter, .. } => filter.len(),
        }
    }

    pub(crate) const fn target(&self) -> &TableRef {
        match self {
            Self::CreateTable { target, .. }
            | Self::Insert { target, .. }
            | Self::Select { target, .. }
            | Self::Delete { target, .. } => target,
        }
    }
}

///
/// Token
///

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    /// Bare word; identifiers are case-folded, keywords matched case-insensitively.
    Word(String),
    /// Quoted identifier, exact.
    Quoted(String),
    Punct(char),
}

pub(crate) fn parse(text: &str) -> Result<Statement, StoreError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };

    let statement = if parser.eat_keyword("CREATE") {
        parser.create_table()?
    } else if parser.eat_keyword("INSERT") {
        parser.insert()?
    } else if parser.eat_keyword("SELECT") {
        parser.select()?
    } else if parser.eat_keyword("DELETE") {
        parser.delete()?
    } else {
        return Err(syntax("unsupported statement"));
    };

    parser.eat_punct(';');
    if parser.pos != parser.tokens.len() {
        return Err(syntax("unexpected trailing input"));
    }

    Ok(statement)
}

fn syntax(message: &str) -> StoreError {
    StoreError::execution(format!("syntax error: {message}"))
}

fn tokenize(text: &str) -> Result<Vec<Token>, StoreError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == DELIMITER {
            chars.next();
            let mut ident = String::new();
            loop {
                match chars.next() {
                    Some(c) if c == DELIMITER => {
                        if chars.peek() == Some(&DELIMITER) {
                            chars.next();
                            ident.push(DELIMITER);
                        } else {
                            break;
                        }
                    }
                    Some(c) => ident.push(c),
                    None => return Err(syntax("unterminated quoted identifier")),
                }
            }
            tokens.push(Token::Quoted(ident));
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if !(c.is_ascii_alphanumeric() || c == '_') {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else if "(),.=?;*".contains(ch) {
            chars.next();
            tokens.push(Token::Punct(ch));
        } else {
            return Err(syntax(&format!("unexpected character '{ch}'")));
        }
    }

    Ok(tokens)
}

///
/// Parser
///

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(word)) if word.eq_ignore_ascii_case(keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.peek_keyword(keyword);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), StoreError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(syntax(&format!("expected {keyword}")))
        }
    }

    fn eat_punct(&mut self, punct: char) -> bool {
        let found = self.peek() == Some(&Token::Punct(punct));
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_punct(&mut self, punct: char) -> Result<(), StoreError> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            Err(syntax(&format!("expected '{punct}'")))
        }
    }

    fn ident(&mut self) -> Result<String, StoreError> {
        let ident = match self.peek() {
            Some(Token::Word(word)) => word.to_ascii_lowercase(),
            Some(Token::Quoted(ident)) => ident.clone(),
            _ => return Err(syntax("expected identifier")),
        };
        self.pos += 1;

        Ok(ident)
    }

    fn table_ref(&mut self) -> Result<TableRef, StoreError> {
        let first = self.ident()?;
        if self.eat_punct('.') {
            Ok(TableRef {
                keyspace: Some(first),
                table: self.ident()?,
            })
        } else {
            Ok(TableRef {
                keyspace: None,
                table: first,
            })
        }
    }

    fn ident_list(&mut self) -> Result<Vec<String>, StoreError> {
        let mut idents = vec![self.ident()?];
        while self.eat_punct(',') {
            idents.push(self.ident()?);
        }

        Ok(idents)
    }

    // CREATE TABLE IF NOT EXISTS ks.t (c type, ..., PRIMARY KEY ((k, ...)))
    fn create_table(&mut self) -> Result<Statement, StoreError> {
        self.expect_keyword("TABLE")?;
        self.expect_keyword("IF")?;
        self.expect_keyword("NOT")?;
        self.expect_keyword("EXISTS")?;
        let target = self.table_ref()?;
        self.expect_punct('(')?;

        let mut columns = Vec::new();
        while !self.peek_keyword("PRIMARY") {
            let name = self.ident()?;
            let type_name = self.ident()?;
            let ty = ColumnType::parse(&type_name)
                .ok_or_else(|| syntax(&format!("unknown type '{type_name}'")))?;
            columns.push((name, ty));
            self.expect_punct(',')?;
        }

        self.expect_keyword("PRIMARY")?;
        self.expect_keyword("KEY")?;
        self.expect_punct('(')?;
        let partition_key = if self.eat_punct('(') {
            let keys = self.ident_list()?;
            self.expect_punct(')')?;
            keys
        } else {
            vec![self.ident()?]
        };
        self.expect_punct(')')?;
        self.expect_punct(')')?;

        Ok(Statement::CreateTable {
            target,
            columns,
            partition_key,
        })
    }

    // INSERT INTO ks.t (c, ...) VALUES (?, ...)
    fn insert(&mut self) -> Result<Statement, StoreError> {
        self.expect_keyword("INTO")?;
        let target = self.table_ref()?;
        self.expect_punct('(')?;
        let columns = self.ident_list()?;
        self.expect_punct(')')?;
        self.expect_keyword("VALUES")?;
        self.expect_punct('(')?;

        let mut markers = 0;
        loop {
            self.expect_punct('?')?;
            markers += 1;
            if !self.eat_punct(',') {
                break;
            }
        }
        self.expect_punct(')')?;

        if markers != columns.len() {
            return Err(syntax("column and value counts differ"));
        }

        Ok(Statement::Insert { target, columns })
    }

    // SELECT c, ... FROM ks.t [WHERE k = ? AND ...]
    fn select(&mut self) -> Result<Statement, StoreError> {
        let columns = self.ident_list()?;
        self.expect_keyword("FROM")?;
        let target = self.table_ref()?;
        let filter = self.where_clause(false)?;

        Ok(Statement::Select {
            target,
            columns,
            filter,
        })
    }

    // DELETE FROM ks.t WHERE k = ? AND ...
    fn delete(&mut self) -> Result<Statement, StoreError> {
        self.expect_keyword("FROM")?;
        let target = self.table_ref()?;
        let filter = self.where_clause(true)?;

        Ok(Statement::Delete { target, filter })
    }

    fn where_clause(&mut self, required: bool) -> Result<Vec<String>, StoreError> {
        if !self.eat_keyword("WHERE") {
            return if required {
                Err(syntax("expected WHERE"))
            } else {
                Ok(Vec::new())
            };
        }

        let mut filter = Vec::new();
        loop {
            filter.push(self.ident()?);
            self.expect_punct('=')?;
            self.expect_punct('?')?;
            if !self.eat_keyword("AND") {
                break;
            }
        }

        Ok(filter)
    }
}

///
/// TESTS
///
