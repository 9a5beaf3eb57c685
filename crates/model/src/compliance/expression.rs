//! Identity verification expressions.
//!
//! Users write expressions in infix form with explicit grouping, e.g.
//! `( kyc OR aml ) AND collateral`. The verification module evaluates the
//! postfix form of the same expression, which [`to_postfix`] derives with a
//! shunting-yard pass. `AND` binds tighter than `OR` and both are left
//! associative.

use {
    crate::{
        Validate,
        error::ValidationError,
        input,
        topic::{TopicName, topic_id},
    },
    alloy_primitives::U256,
    number::serialization::{DecimalU256, parse_u256},
    serde::{Serialize, Serializer},
    serde_json::Value,
    serde_with::serde_as,
    std::collections::HashSet,
};

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, strum::Display, strum::FromRepr, strum::AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum NodeType {
    Topic = 0,
    And = 1,
    Or = 2,
}

impl NodeType {
    fn precedence(self) -> u8 {
        match self {
            Self::Topic => 0,
            Self::Or => 1,
            Self::And => 2,
        }
    }
}

impl Serialize for NodeType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

/// A topic check or a boolean operator. Operator nodes carry a value that
/// is ignored on evaluation and usually zero.
#[serde_as]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionNode {
    pub node_type: NodeType,
    #[serde_as(as = "DecimalU256")]
    pub value: U256,
}

impl ExpressionNode {
    pub fn topic(topic: TopicName) -> Self {
        Self {
            node_type: NodeType::Topic,
            value: topic_id(topic),
        }
    }

    pub fn and() -> Self {
        Self {
            node_type: NodeType::And,
            value: U256::ZERO,
        }
    }

    pub fn or() -> Self {
        Self {
            node_type: NodeType::Or,
            value: U256::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ExpressionToken {
    Open,
    Close,
    Node(ExpressionNode),
}

impl From<ExpressionNode> for ExpressionToken {
    fn from(node: ExpressionNode) -> Self {
        Self::Node(node)
    }
}

impl From<TopicName> for ExpressionToken {
    fn from(topic: TopicName) -> Self {
        Self::Node(ExpressionNode::topic(topic))
    }
}

/// A well formed infix expression together with its postfix form.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Expression {
    tokens: Vec<ExpressionToken>,
    postfix: Vec<ExpressionNode>,
}

impl Expression {
    /// Checks that parentheses are balanced and every operator has two
    /// operands. An empty expression is well formed and always true.
    pub fn new(tokens: Vec<ExpressionToken>) -> Result<Self, ValidationError> {
        let postfix = to_postfix(&tokens)?;
        Ok(Self { tokens, postfix })
    }

    pub fn tokens(&self) -> &[ExpressionToken] {
        &self.tokens
    }

    pub fn postfix(&self) -> &[ExpressionNode] {
        &self.postfix
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether an identity holding the `claimed` topic ids satisfies the
    /// expression.
    pub fn evaluate(&self, claimed: &HashSet<U256>) -> bool {
        // The postfix form of a well formed expression always evaluates.
        evaluate_postfix(&self.postfix, claimed).unwrap_or(false)
    }
}

#[derive(Clone, Copy)]
enum Pending {
    Open(usize),
    Operator(ExpressionNode),
}

/// Converts infix tokens into postfix nodes.
pub fn to_postfix(tokens: &[ExpressionToken]) -> Result<Vec<ExpressionNode>, ValidationError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut pending = Vec::new();
    let mut expect_operand = true;

    for (index, token) in tokens.iter().enumerate() {
        match token {
            ExpressionToken::Open => {
                if !expect_operand {
                    return Err(ValidationError::format("missing operator before \"(\"").at(index));
                }
                pending.push(Pending::Open(index));
            }
            ExpressionToken::Close => {
                if expect_operand {
                    return Err(ValidationError::format("missing operand before \")\"").at(index));
                }
                loop {
                    match pending.pop() {
                        Some(Pending::Operator(operator)) => output.push(operator),
                        Some(Pending::Open(_)) => break,
                        None => {
                            return Err(ValidationError::format("unbalanced \")\"").at(index));
                        }
                    }
                }
            }
            ExpressionToken::Node(node) if node.node_type == NodeType::Topic => {
                if !expect_operand {
                    return Err(ValidationError::format("missing operator before topic").at(index));
                }
                output.push(*node);
                expect_operand = false;
            }
            ExpressionToken::Node(node) => {
                if expect_operand {
                    return Err(ValidationError::format(format!(
                        "{} is missing its left operand",
                        node.node_type
                    ))
                    .at(index));
                }
                while let Some(&Pending::Operator(top)) = pending.last() {
                    if top.node_type.precedence() < node.node_type.precedence() {
                        break;
                    }
                    output.push(top);
                    pending.pop();
                }
                pending.push(Pending::Operator(*node));
                expect_operand = true;
            }
        }
    }

    if !tokens.is_empty() && expect_operand {
        return Err(ValidationError::format("expression ends without an operand").at(tokens.len() - 1));
    }
    while let Some(entry) = pending.pop() {
        match entry {
            Pending::Operator(operator) => output.push(operator),
            Pending::Open(index) => {
                return Err(ValidationError::format("unbalanced \"(\"").at(index));
            }
        }
    }
    Ok(output)
}

/// The postfix nodes handed to the verification module.
///
/// Infix token lists are converted. Lists that already are in postfix form,
/// as read back from the module, are taken as they are.
pub fn postfix_form(tokens: &[ExpressionToken]) -> Result<Vec<ExpressionNode>, ValidationError> {
    let infix_error = match to_postfix(tokens) {
        Ok(postfix) => return Ok(postfix),
        Err(err) => err,
    };
    let nodes = tokens
        .iter()
        .map(|token| match token {
            ExpressionToken::Node(node) => Some(*node),
            ExpressionToken::Open | ExpressionToken::Close => None,
        })
        .collect::<Option<Vec<_>>>();
    match nodes {
        Some(nodes) if evaluate_postfix(&nodes, &HashSet::new()).is_ok() => Ok(nodes),
        _ => Err(infix_error),
    }
}

/// Evaluates postfix nodes against the topic ids an identity holds claims
/// for. An empty expression is true.
pub fn evaluate_postfix(
    nodes: &[ExpressionNode],
    claimed: &HashSet<U256>,
) -> Result<bool, ValidationError> {
    let mut stack = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        let result = match node.node_type {
            NodeType::Topic => claimed.contains(&node.value),
            operator => {
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                    return Err(ValidationError::format(format!(
                        "{operator} needs two operands"
                    ))
                    .at(index));
                };
                match operator {
                    NodeType::And => left && right,
                    _ => left || right,
                }
            }
        };
        stack.push(result);
    }
    match stack.as_slice() {
        [] => Ok(true),
        [result] => Ok(*result),
        _ => Err(ValidationError::format(format!(
            "expression leaves {} unconnected operands",
            stack.len()
        ))),
    }
}

impl Validate for ExpressionNode {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = input::as_object(value)?;
        Ok(Self {
            node_type: input::field(object, "nodeType", node_type)?,
            value: input::field(object, "value", uint256)?,
        })
    }
}

fn node_type(value: &Value) -> Result<NodeType, ValidationError> {
    let Some(number) = value.as_number().filter(|n| n.is_i64() || n.is_u64()) else {
        return Err(ValidationError::type_mismatch("an integer node type", value));
    };
    number
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .and_then(NodeType::from_repr)
        .ok_or_else(|| {
            ValidationError::range(format!(
                "node type {number} is not one of 0 (TOPIC), 1 (AND) or 2 (OR)"
            ))
        })
}

fn uint256(value: &Value) -> Result<U256, ValidationError> {
    match value {
        Value::String(s) => parse_u256(s).map_err(|err| ValidationError::format(err.to_string())),
        Value::Number(n) => {
            parse_u256(&n.to_string()).map_err(|err| ValidationError::format(err.to_string()))
        }
        other => Err(ValidationError::type_mismatch(
            "a uint256 as a decimal or 0x hex string",
            other,
        )),
    }
}

impl Validate for ExpressionToken {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(s) if s == "(" => Ok(Self::Open),
            Value::String(s) if s == ")" => Ok(Self::Close),
            Value::String(s) => Err(ValidationError::format(format!(
                "expected \"(\" or \")\", found {s:?}"
            ))),
            Value::Object(_) => Ok(Self::Node(ExpressionNode::validate(value)?)),
            other => Err(ValidationError::type_mismatch(
                "a parenthesis or an expression node",
                other,
            )),
        }
    }
}

impl Validate for Expression {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        Self::new(input::list(value, ExpressionToken::validate)?)
    }
}

impl Serialize for ExpressionToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Open => serializer.serialize_str("("),
            Self::Close => serializer.serialize_str(")"),
            Self::Node(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for Expression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.tokens.serialize(serializer)
    }
}

deserialize_with_validate!(ExpressionNode);
deserialize_with_validate!(Expression);

#[cfg(test)]
mod tests {
    use {
        super::*,
        super::ExpressionToken::{Close, Open},
        crate::{
            error::ErrorKind,
            topic::TopicName::{Aml, Collateral, Kyc},
        },
        serde_json::json,
    };

    fn and() -> ExpressionToken {
        ExpressionNode::and().into()
    }

    fn or() -> ExpressionToken {
        ExpressionNode::or().into()
    }

    fn claims(topics: &[TopicName]) -> HashSet<U256> {
        topics.iter().map(|&topic| topic_id(topic)).collect()
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // kyc OR aml AND collateral == kyc OR (aml AND collateral)
        let expression = Expression::new(vec![Kyc.into(), or(), Aml.into(), and(), Collateral.into()])
            .unwrap();
        assert_eq!(
            expression.postfix(),
            [
                ExpressionNode::topic(Kyc),
                ExpressionNode::topic(Aml),
                ExpressionNode::topic(Collateral),
                ExpressionNode::and(),
                ExpressionNode::or(),
            ]
        );
        assert!(expression.evaluate(&claims(&[Kyc])));
        assert!(!expression.evaluate(&claims(&[Aml])));
        assert!(expression.evaluate(&claims(&[Aml, Collateral])));
    }

    #[test]
    fn parentheses_group() {
        let expression = Expression::new(vec![
            Open,
            Kyc.into(),
            or(),
            Aml.into(),
            Close,
            and(),
            Collateral.into(),
        ])
        .unwrap();
        assert_eq!(
            expression.postfix(),
            [
                ExpressionNode::topic(Kyc),
                ExpressionNode::topic(Aml),
                ExpressionNode::or(),
                ExpressionNode::topic(Collateral),
                ExpressionNode::and(),
            ]
        );
        assert!(!expression.evaluate(&claims(&[Kyc])));
        assert!(expression.evaluate(&claims(&[Kyc, Collateral])));
    }

    #[test]
    fn empty_expression_is_true() {
        let expression = Expression::new(vec![]).unwrap();
        assert!(expression.postfix().is_empty());
        assert!(expression.evaluate(&HashSet::new()));
    }

    #[test]
    fn malformed_expressions() {
        for (tokens, index) in [
            (vec![Open, Kyc.into()], 0),
            (vec![Kyc.into(), Close], 1),
            (vec![and(), Kyc.into()], 0),
            (vec![Kyc.into(), and()], 1),
            (vec![Kyc.into(), Aml.into()], 1),
            (vec![Open, Close], 1),
            (vec![Kyc.into(), Open, Aml.into(), Close], 1),
        ] {
            let err = Expression::new(tokens.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{tokens:?}");
            assert_eq!(err.path().to_string(), format!("[{index}]"), "{tokens:?}");
        }
    }

    #[test]
    fn postfix_form_accepts_both_notations() {
        let infix = [Kyc.into(), and(), Aml.into()];
        let postfix = [Kyc.into(), Aml.into(), and()];
        let expected = [
            ExpressionNode::topic(Kyc),
            ExpressionNode::topic(Aml),
            ExpressionNode::and(),
        ];
        assert_eq!(postfix_form(&infix).unwrap(), expected);
        assert_eq!(postfix_form(&postfix).unwrap(), expected);
        assert!(postfix_form(&[]).unwrap().is_empty());

        for tokens in [vec![Open, Close], vec![Kyc.into(), and()], vec![Kyc.into(), Aml.into()]] {
            assert_eq!(
                postfix_form(&tokens).unwrap_err().kind(),
                ErrorKind::Format,
                "{tokens:?}"
            );
        }
    }

    #[test]
    fn postfix_arity_is_checked() {
        let err = evaluate_postfix(&[ExpressionNode::topic(Kyc), ExpressionNode::and()], &HashSet::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(
            evaluate_postfix(
                &[ExpressionNode::topic(Kyc), ExpressionNode::topic(Aml)],
                &HashSet::new()
            )
            .is_err()
        );
    }

    #[test]
    fn validates_json_tokens() {
        let kyc = topic_id(Kyc);
        let expression = Expression::validate(&json!([
            "(",
            {"nodeType": 0, "value": kyc.to_string()},
            {"nodeType": 2, "value": 0},
            {"nodeType": 0, "value": const_hex::encode_prefixed(kyc.to_be_bytes::<32>())},
            ")",
        ]))
        .unwrap();
        assert_eq!(expression.tokens().len(), 5);
        assert!(expression.evaluate(&claims(&[Kyc])));

        let serialized = serde_json::to_value(&expression).unwrap();
        assert_eq!(serialized[1], json!({"nodeType": 0, "value": kyc.to_string()}));
        assert_eq!(Expression::validate(&serialized).unwrap(), expression);
    }

    #[test]
    fn invalid_json_tokens() {
        let err = Expression::validate(&json!(["[", ")"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.path().to_string(), "[0]");

        let err = Expression::validate(&json!([{"nodeType": 3, "value": "0"}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.path().to_string(), "[0].nodeType");

        let err = Expression::validate(&json!([{"nodeType": "0", "value": "0"}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = Expression::validate(&json!([{"nodeType": 0, "value": "-1"}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.path().to_string(), "[0].value");

        let big = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let node = ExpressionNode::validate(&serde_json::from_str(&format!(
            r#"{{"nodeType": 0, "value": {big}}}"#
        ))
        .unwrap())
        .unwrap();
        assert_eq!(node.value, U256::MAX);

        let err = Expression::validate(&json!([{"nodeType": 0}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }
}
